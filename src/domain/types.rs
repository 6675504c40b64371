//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during loading and cleaning
//! - exported to JSON/CSV
//! - handed to the terminal renderer without further conversion

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDateTime;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One spreadsheet cell, as read from the container.
///
/// No invariants: arbitrary garbage is expected here.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
    /// Spreadsheet error value (`#N/A`, `#DIV/0!`, ...).
    Error(String),
}

static EMPTY_CELL: Cell = Cell::Empty;

impl Cell {
    /// Build a text cell, treating whitespace-only text as empty.
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.trim().is_empty() { Cell::Empty } else { Cell::Text(s) }
    }

    /// Null in the pandas sense: missing, blank, or a spreadsheet error value.
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Empty | Cell::Error(_))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Number(v) => write!(f, "{v}"),
            Cell::Bool(b) => write!(f, "{b}"),
            Cell::DateTime(dt) => write!(f, "{dt}"),
            Cell::Error(e) => write!(f, "{e}"),
        }
    }
}

/// One data row of a sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 1-based position among the sheet's data rows (header excluded).
    pub index: usize,
    pub cells: Vec<Cell>,
}

impl RawRow {
    pub fn new(index: usize, cells: Vec<Cell>) -> Self {
        Self { index, cells }
    }

    /// Cell at `column`; short rows read as empty.
    pub fn cell(&self, column: usize) -> &Cell {
        self.cells.get(column).unwrap_or(&EMPTY_CELL)
    }
}

/// One named table of the uploaded container.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawSheet {
    /// Exact, case-sensitive header lookup.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// The whole uploaded container: sheets in their original order.
#[derive(Debug, Clone, PartialEq)]
pub struct Workbook {
    /// Display name of the source (file name or `demo`).
    pub source: String,
    pub sheets: Vec<RawSheet>,
}

/// Names of the two required columns.
///
/// Older exports used lowercase `date`/`price`; the default follows the
/// current `Date`/`Price` convention and both are overridable from the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnNames {
    pub date: String,
    pub price: String,
}

pub const DEFAULT_DATE_COLUMN: &str = "Date";
pub const DEFAULT_PRICE_COLUMN: &str = "Price";

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            date: DEFAULT_DATE_COLUMN.to_string(),
            price: DEFAULT_PRICE_COLUMN.to_string(),
        }
    }
}

impl ColumnNames {
    pub fn new(date: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            price: price.into(),
        }
    }

    /// Required columns absent from `sheet`, in `[date, price]` order.
    pub fn missing_in(&self, sheet: &RawSheet) -> Vec<String> {
        [&self.date, &self.price]
            .into_iter()
            .filter(|name| sheet.column_index(name).is_none())
            .cloned()
            .collect()
    }
}

/// How much detail the validation report carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportDetail {
    /// Only the removed/total summary lines.
    Summary,
    /// Summary plus one `Row N: reasons` line per rejected row.
    Itemized,
}

/// Chart rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Full cleaned series, not resampled.
    Line,
    /// Daily OHLC bars plus a signed range strip.
    Candlestick,
}

impl ChartKind {
    pub fn toggle(self) -> Self {
        match self {
            ChartKind::Line => ChartKind::Candlestick,
            ChartKind::Candlestick => ChartKind::Line,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ChartKind::Line => "line",
            ChartKind::Candlestick => "candlestick",
        }
    }
}

/// Market indices available as chart overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MarketIndex {
    #[value(name = "sp500")]
    Sp500,
    #[value(name = "dow")]
    DowJones,
    #[value(name = "nasdaq")]
    Nasdaq,
}

impl MarketIndex {
    pub const ALL: [MarketIndex; 3] = [MarketIndex::Sp500, MarketIndex::DowJones, MarketIndex::Nasdaq];

    /// Ticker symbol on the quote service.
    pub fn symbol(self) -> &'static str {
        match self {
            MarketIndex::Sp500 => "^GSPC",
            MarketIndex::DowJones => "^DJI",
            MarketIndex::Nasdaq => "^IXIC",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            MarketIndex::Sp500 => "S&P 500",
            MarketIndex::DowJones => "Dow Jones",
            MarketIndex::Nasdaq => "NASDAQ",
        }
    }
}

impl fmt::Display for MarketIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Where the workbook comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkbookSource {
    File(PathBuf),
    /// Seeded synthetic workbook (see `data::sample`).
    Demo { seed: u64 },
}

/// Everything one run needs, resolved from CLI flags and environment.
#[derive(Debug, Clone)]
pub struct DashConfig {
    pub source: WorkbookSource,
    pub columns: ColumnNames,
    pub detail: ReportDetail,
    pub chart: ChartKind,
    pub show_indices: bool,
    pub indices: Vec<MarketIndex>,
    pub index_timeout: Duration,
    /// Sheet to show first; defaults to the first selectable sheet.
    pub sheet: Option<String>,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    pub export_series: Option<PathBuf>,
    pub export_ohlc: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            source: WorkbookSource::Demo { seed: 42 },
            columns: ColumnNames::default(),
            detail: ReportDetail::Itemized,
            chart: ChartKind::Line,
            show_indices: false,
            indices: MarketIndex::ALL.to_vec(),
            index_timeout: Duration::from_secs(10),
            sheet: None,
            plot: false,
            plot_width: 100,
            plot_height: 20,
            export_series: None,
            export_ohlc: None,
            export_json: None,
        }
    }
}

/// The user's current selection, passed explicitly into view building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRequest {
    pub sheet: String,
    pub chart: ChartKind,
    pub show_indices: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(headers: &[&str]) -> RawSheet {
        RawSheet {
            name: "S".to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    #[test]
    fn column_match_is_case_sensitive() {
        let cols = ColumnNames::default();
        assert!(cols.missing_in(&sheet(&["Date", "Price"])).is_empty());
        assert_eq!(cols.missing_in(&sheet(&["date", "Price"])), vec!["Date".to_string()]);
        assert_eq!(
            ColumnNames::new("date", "price").missing_in(&sheet(&["Date", "Price", "Volume"])),
            vec!["date".to_string(), "price".to_string()]
        );
    }

    #[test]
    fn short_rows_read_as_empty() {
        let row = RawRow::new(1, vec![Cell::Number(1.0)]);
        assert_eq!(row.cell(0), &Cell::Number(1.0));
        assert!(row.cell(5).is_null());
    }

    #[test]
    fn blank_text_is_null() {
        assert!(Cell::text("   ").is_null());
        assert!(Cell::Error("#N/A".to_string()).is_null());
        assert!(!Cell::text("x").is_null());
    }
}
