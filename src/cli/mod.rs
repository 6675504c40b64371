//! Command-line parsing for the stock workbook dashboard.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! loading/cleaning code; everything folds into one `DashConfig` in `app`.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::domain::{ChartKind, DEFAULT_DATE_COLUMN, DEFAULT_PRICE_COLUMN, MarketIndex};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "sdash", version, about = "Stock workbook cleaner and dashboard")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` wins when set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Clean every sheet and print warnings, validation reports and metrics.
    Report(ReportArgs),
    /// Print the daily OHLC table for one sheet.
    Ohlc(OhlcArgs),
    /// Launch the interactive dashboard.
    ///
    /// Uses the same load/clean pipeline as `sdash report`, rendered with Ratatui.
    Tui(TuiArgs),
}

/// Where the workbook comes from and how it is read.
#[derive(Debug, Args, Clone)]
pub struct WorkbookArgs {
    /// Workbook to load (.xlsx, .xlsm, .xlsb, .xls, .ods, .csv). Prompts when omitted.
    #[arg(short = 'f', long, value_name = "PATH", conflicts_with = "demo")]
    pub file: Option<PathBuf>,

    /// Use a generated demo workbook instead of a file.
    #[arg(long)]
    pub demo: bool,

    /// Seed for the demo workbook.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Name of the date column.
    #[arg(long, default_value = DEFAULT_DATE_COLUMN)]
    pub date_column: String,

    /// Name of the price column.
    #[arg(long, default_value = DEFAULT_PRICE_COLUMN)]
    pub price_column: String,

    /// List every removed row in the validation report.
    #[arg(long)]
    pub itemize: bool,

    /// Sheet to show (defaults to the first sheet with usable data).
    #[arg(long)]
    pub sheet: Option<String>,
}

/// Chart and overlay options shared by `report` and `tui`.
#[derive(Debug, Args, Clone)]
pub struct ChartArgs {
    /// Chart kind.
    #[arg(long, value_enum, default_value_t = ChartKind::Line)]
    pub chart: ChartKind,

    /// Overlay market indices on the chart.
    #[arg(long)]
    pub show_indices: bool,

    /// Indices to fetch when overlays are enabled.
    #[arg(long, value_enum, value_delimiter = ',', default_values_t = MarketIndex::ALL)]
    pub indices: Vec<MarketIndex>,

    /// Per-index request timeout (seconds).
    #[arg(long, default_value_t = 10)]
    pub index_timeout_secs: u64,
}

#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub workbook: WorkbookArgs,

    #[command(flatten)]
    pub chart: ChartArgs,

    /// Only report on the selected sheet instead of all of them.
    #[arg(long)]
    pub only_selected: bool,

    /// Render an ASCII price plot for the selected sheet.
    #[arg(long)]
    pub plot: bool,

    /// Print the selected sheet's cleaned rows, other columns included.
    #[arg(long)]
    pub rows: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export the selected sheet's cleaned series to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the selected sheet's daily OHLC bars to CSV.
    #[arg(long = "export-ohlc", value_name = "CSV")]
    pub export_ohlc: Option<PathBuf>,

    /// Export the selected sheet's full view (series, report, chart data, metrics) to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct OhlcArgs {
    #[command(flatten)]
    pub workbook: WorkbookArgs,

    /// Export the bars to CSV as well.
    #[arg(long = "export-ohlc", value_name = "CSV")]
    pub export_ohlc: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    #[command(flatten)]
    pub workbook: WorkbookArgs,

    #[command(flatten)]
    pub chart: ChartArgs,

    /// Write logs to this file (the dashboard owns the terminal).
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}
