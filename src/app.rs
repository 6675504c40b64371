//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and sets up logging
//! - folds flags into one `DashConfig`
//! - runs the load/clean pipeline
//! - prints reports/plots or launches the dashboard
//! - writes optional exports

use std::time::Duration;

use clap::Parser;
use tracing::warn;

use crate::aggregate::daily_ohlc;
use crate::cli::{ChartArgs, Command, OhlcArgs, ReportArgs, TuiArgs, WorkbookArgs};
use crate::data::{IndexSource, OverlaySet, YahooIndexSource};
use crate::domain::{ChartKind, ColumnNames, DashConfig, ReportDetail, ViewRequest, WorkbookSource};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `sdash` binary.
pub fn run() -> Result<(), AppError> {
    // `sdash` and `sdash -f book.xlsx` behave like `sdash tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Report(args) => {
            crate::logging::init_stderr(cli.verbose);
            handle_report(args)
        }
        Command::Ohlc(args) => {
            crate::logging::init_stderr(cli.verbose);
            handle_ohlc(args)
        }
        Command::Tui(args) => {
            crate::logging::init_file(cli.verbose, args.log_file.as_deref())?;
            handle_tui(args)
        }
    }
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    let mut config = base_config(&args.workbook)?;
    apply_chart_args(&mut config, &args.chart);
    config.plot = args.plot;
    config.plot_width = args.width;
    config.plot_height = args.height;
    config.export_series = args.export.clone();
    config.export_ohlc = args.export_ohlc.clone();
    config.export_json = args.export_json.clone();

    let dash = pipeline::load_dashboard(&config)?;
    println!("{}", crate::report::format_dashboard_summary(&dash));

    let selected = dash.initial_sheet(config.sheet.as_deref())?;
    let names: Vec<String> = if args.only_selected {
        vec![selected.clone()]
    } else {
        dash.stock_names().into_iter().map(str::to_string).collect()
    };

    let source = if config.show_indices { index_source(&config) } else { None };
    for name in names {
        let request = ViewRequest {
            sheet: name.clone(),
            chart: config.chart,
            show_indices: config.show_indices,
        };
        let overlays = fetch_for(&dash, &request, &config, source.as_deref());
        let view = pipeline::build_view(&dash, &request, overlays.as_ref())?;
        print!("{}", crate::report::format_sheet_view(&view));

        if name != selected {
            continue;
        }
        if config.plot {
            println!();
            print!(
                "{}",
                crate::plot::render_price_plot(&view, config.plot_width, config.plot_height)
            );
        }
        if args.rows {
            println!("\nCleaned rows ({}):", view.series.rows().len());
            print!("{}", crate::report::format_rows_table(&view.series, &dash.columns));
        }

        // Optional exports (selected sheet only).
        if let Some(path) = &config.export_series {
            crate::io::write_series_csv(path, &view.series, &dash.columns)?;
        }
        if let Some(path) = &config.export_ohlc {
            crate::io::write_ohlc_csv(path, &daily_ohlc(&view.series))?;
        }
        if let Some(path) = &config.export_json {
            crate::io::write_view_json(path, &view)?;
        }
    }

    Ok(())
}

fn handle_ohlc(args: OhlcArgs) -> Result<(), AppError> {
    let config = base_config(&args.workbook)?;
    let dash = pipeline::load_dashboard(&config)?;
    for warning in dash.skipped.iter().chain(&dash.failures) {
        eprintln!("{warning}");
    }

    let selected = dash.initial_sheet(config.sheet.as_deref())?;
    let request = ViewRequest {
        sheet: selected,
        chart: ChartKind::Candlestick,
        show_indices: false,
    };
    let view = pipeline::build_view(&dash, &request, None)?;
    let pipeline::ChartData::Candles { bars, .. } = &view.chart else {
        return Err(AppError::new(4, "Candlestick view did not produce bars."));
    };

    println!("{} ({} rows -> {} days)", view.name, view.stats.rows, bars.len());
    print!("{}", crate::report::format_ohlc_table(bars));

    if let Some(path) = &args.export_ohlc {
        crate::io::write_ohlc_csv(path, bars)?;
    }
    Ok(())
}

fn handle_tui(args: TuiArgs) -> Result<(), AppError> {
    let mut config = base_config(&args.workbook)?;
    apply_chart_args(&mut config, &args.chart);

    let dash = pipeline::load_dashboard(&config)?;
    let source = index_source(&config);
    crate::tui::run(config, dash, source)
}

/// Resolve the shared workbook flags. Prompts for a file when neither
/// `-f` nor `--demo` is given.
pub fn base_config(args: &WorkbookArgs) -> Result<DashConfig, AppError> {
    let source = if args.demo {
        WorkbookSource::Demo { seed: args.seed }
    } else {
        let path = match &args.file {
            Some(path) => crate::cli::picker::check_workbook_path(path)?,
            None => crate::cli::picker::prompt_for_workbook()?,
        };
        WorkbookSource::File(path)
    };

    if args.date_column.trim().is_empty() || args.price_column.trim().is_empty() {
        return Err(AppError::new(2, "Column names must not be empty."));
    }
    if args.date_column == args.price_column {
        return Err(AppError::new(2, "Date and price columns must differ."));
    }

    Ok(DashConfig {
        source,
        columns: ColumnNames::new(args.date_column.clone(), args.price_column.clone()),
        detail: if args.itemize {
            ReportDetail::Itemized
        } else {
            ReportDetail::Summary
        },
        sheet: args.sheet.clone(),
        ..DashConfig::default()
    })
}

fn apply_chart_args(config: &mut DashConfig, args: &ChartArgs) {
    config.chart = args.chart;
    config.show_indices = args.show_indices;
    config.indices = args.indices.clone();
    config.index_timeout = Duration::from_secs(args.index_timeout_secs.max(1));
}

/// The network index source; `None` (with a warning) if the client cannot be built.
fn index_source(config: &DashConfig) -> Option<Box<dyn IndexSource>> {
    match YahooIndexSource::from_env(config.index_timeout) {
        Ok(source) => Some(Box::new(source)),
        Err(err) => {
            warn!("index overlays disabled: {err}");
            None
        }
    }
}

fn fetch_for(
    dash: &pipeline::Dashboard,
    request: &ViewRequest,
    config: &DashConfig,
    source: Option<&dyn IndexSource>,
) -> Option<OverlaySet> {
    if !request.show_indices {
        return None;
    }
    let sheet = dash.sheet(&request.sheet)?;
    Some(pipeline::load_overlays(source?, &config.indices, &sheet.series))
}

/// Rewrite argv so `sdash` defaults to `sdash tui`.
///
/// Rules:
/// - `sdash`                       -> `sdash tui`
/// - `sdash -f book.xlsx ...`      -> `sdash tui -f book.xlsx ...`
/// - `sdash --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "report" | "ohlc" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
    }
    argv
}
