//! Shared "dashboard pipeline" logic used by both CLI and TUI front-ends.
//!
//! Loader -> Validator -> Aggregator, run once per invocation:
//! workbook -> usable sheets -> cleaned sheets (+ failures) -> per-sheet views
//!
//! The CLI and the TUI then only deal with presentation.

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{info, warn};

use crate::aggregate::{CandleRange, OhlcBar, SeriesStats, SummaryMetrics, candle_ranges, daily_ohlc};
use crate::clean::{CleanedSheet, ValidationReport, clean_sheet};
use crate::data::{IndexSource, OverlaySet, fetch_overlays, generate_demo_workbook};
use crate::domain::{
    ChartKind, CleanedSeries, ColumnNames, DashConfig, IndexSeries, MarketIndex, ReportDetail, ViewRequest,
    Workbook, WorkbookSource,
};
use crate::error::{AppError, SheetError};
use crate::io::{load_workbook, partition_sheets};

/// Every sheet of one workbook after loading and cleaning.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub source: String,
    pub columns: ColumnNames,
    /// Selectable sheets, in workbook order.
    pub sheets: Vec<CleanedSheet>,
    /// Sheets skipped by the loader (missing required columns).
    pub skipped: Vec<SheetError>,
    /// Sheets where no row survived cleaning.
    pub failures: Vec<SheetError>,
}

impl Dashboard {
    pub fn stock_names(&self) -> Vec<&str> {
        self.sheets.iter().map(CleanedSheet::name).collect()
    }

    pub fn sheet(&self, name: &str) -> Option<&CleanedSheet> {
        self.sheets.iter().find(|s| s.name() == name)
    }

    /// Sheet to show first: `preferred` when given, else the first selectable one.
    pub fn initial_sheet(&self, preferred: Option<&str>) -> Result<String, AppError> {
        if self.sheets.is_empty() {
            return Err(AppError::new(
                3,
                format!("No sheet in '{}' has usable data.", self.source),
            ));
        }
        match preferred {
            Some(name) => self
                .sheet(name)
                .map(|s| s.name().to_string())
                .ok_or_else(|| self.unknown_sheet(name)),
            None => Ok(self.sheets[0].name().to_string()),
        }
    }

    fn unknown_sheet(&self, name: &str) -> AppError {
        AppError::new(
            2,
            format!(
                "Sheet '{name}' is not available. Selectable sheets: {}.",
                self.stock_names().join(", ")
            ),
        )
    }
}

/// Chart payload for one view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChartData {
    /// Full cleaned series in source order, not resampled.
    Line { points: Vec<(NaiveDateTime, f64)> },
    /// Daily bars plus the signed `close - open` strip.
    Candles { bars: Vec<OhlcBar>, ranges: Vec<CandleRange> },
}

/// Everything needed to present one sheet.
#[derive(Debug, Clone, Serialize)]
pub struct SheetView {
    pub name: String,
    pub series: CleanedSeries,
    pub report: ValidationReport,
    pub chart: ChartData,
    pub metrics: SummaryMetrics,
    pub stats: SeriesStats,
    /// Reference series, only when requested. Never part of `metrics`.
    pub overlays: Vec<IndexSeries>,
}

/// Load the configured source and clean every sheet.
///
/// Only a container-level failure is fatal here; per-sheet problems end up in
/// `Dashboard::skipped` / `Dashboard::failures`.
pub fn load_dashboard(config: &DashConfig) -> Result<Dashboard, AppError> {
    let workbook = match &config.source {
        WorkbookSource::File(path) => load_workbook(path)?,
        WorkbookSource::Demo { seed } => generate_demo_workbook(*seed, &config.columns)?,
    };
    Ok(dashboard_from_workbook(&workbook, &config.columns, config.detail))
}

pub fn dashboard_from_workbook(workbook: &Workbook, columns: &ColumnNames, detail: ReportDetail) -> Dashboard {
    let (usable, skipped) = partition_sheets(workbook, columns);

    let mut sheets = Vec::with_capacity(usable.len());
    let mut failures = Vec::new();
    for raw in &usable {
        match clean_sheet(raw, columns, detail) {
            Ok(cleaned) => sheets.push(cleaned),
            Err(err) => {
                warn!("{err}");
                failures.push(err);
            }
        }
    }

    info!(
        source = %workbook.source,
        selectable = sheets.len(),
        skipped = skipped.len(),
        failed = failures.len(),
        "dashboard ready"
    );

    Dashboard {
        source: workbook.source.clone(),
        columns: columns.clone(),
        sheets,
        skipped,
        failures,
    }
}

/// Build the view for one request. Overlays are attached only when the
/// request asks for them and a set was fetched.
pub fn build_view(
    dashboard: &Dashboard,
    request: &ViewRequest,
    overlays: Option<&OverlaySet>,
) -> Result<SheetView, AppError> {
    let sheet = dashboard
        .sheet(&request.sheet)
        .ok_or_else(|| dashboard.unknown_sheet(&request.sheet))?;
    let series = &sheet.series;

    let chart = match request.chart {
        ChartKind::Line => ChartData::Line {
            points: series.points(),
        },
        ChartKind::Candlestick => {
            let bars = daily_ohlc(series);
            let ranges = candle_ranges(&bars);
            ChartData::Candles { bars, ranges }
        }
    };

    let overlays = match overlays {
        Some(set) if request.show_indices => set.series.clone(),
        _ => Vec::new(),
    };

    Ok(SheetView {
        name: sheet.name().to_string(),
        series: series.clone(),
        report: sheet.report.clone(),
        chart,
        metrics: SummaryMetrics::from_series(series),
        stats: SeriesStats::from_series(series),
        overlays,
    })
}

/// Fetch overlays covering the series' date span.
pub fn load_overlays(source: &dyn IndexSource, indices: &[MarketIndex], series: &CleanedSeries) -> OverlaySet {
    let (start, end) = series.date_span();
    fetch_overlays(source, indices, start, end)
}
