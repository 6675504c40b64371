//! Row validation and cleaning.
//!
//! Turns one raw sheet into a typed `CleanedSeries` plus a `ValidationReport`.
//!
//! - every row is evaluated independently into a `RowOutcome`
//! - a row passes only if the null, date and price checks all pass
//! - rejected rows keep their 1-based index and all failure reasons
//! - a sheet with zero surviving rows is an error, never an empty series
//!
//! Duplicate dates are kept here; grouping happens in `aggregate`.

pub mod report;
pub mod rules;

use tracing::{debug, info, warn};

use crate::domain::{CleanedSeries, ColumnNames, RawRow, RawSheet, ReportDetail, ValidatedRow};
use crate::error::SheetError;

pub use report::{RejectionRecord, ValidationReport};
pub use rules::RejectReason;

/// Result of evaluating one row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Valid(ValidatedRow),
    Rejected(RejectionRecord),
}

/// Column positions resolved once per sheet.
#[derive(Debug, Clone)]
pub struct ColumnLayout {
    pub date: (usize, String),
    pub price: (usize, String),
    /// Every other column, in sheet order.
    pub extras: Vec<(usize, String)>,
}

impl ColumnLayout {
    pub fn resolve(sheet: &RawSheet, columns: &ColumnNames) -> Result<Self, SheetError> {
        let missing = columns.missing_in(sheet);
        let (Some(date), Some(price)) = (
            sheet.column_index(&columns.date),
            sheet.column_index(&columns.price),
        ) else {
            return Err(SheetError::MissingColumns {
                sheet: sheet.name.clone(),
                missing,
            });
        };

        let extras = sheet
            .headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != date && *i != price)
            .map(|(i, h)| (i, h.clone()))
            .collect();

        Ok(Self {
            date: (date, columns.date.clone()),
            price: (price, columns.price.clone()),
            extras,
        })
    }
}

/// A sheet that survived cleaning.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedSheet {
    pub series: CleanedSeries,
    pub report: ValidationReport,
}

impl CleanedSheet {
    pub fn name(&self) -> &str {
        self.series.name()
    }
}

/// Run all checks on one row.
pub fn evaluate_row(row: &RawRow, layout: &ColumnLayout) -> RowOutcome {
    let date_cell = row.cell(layout.date.0);
    let price_cell = row.cell(layout.price.0);

    let mut reasons = Vec::new();

    if let Some(r) = rules::check_nulls(&[
        (layout.date.1.as_str(), date_cell),
        (layout.price.1.as_str(), price_cell),
    ]) {
        reasons.push(r);
    }

    // Null cells are already reported above.
    let date = if date_cell.is_null() {
        None
    } else {
        rules::check_date(date_cell)
            .map_err(|r| reasons.push(r))
            .ok()
    };
    let price = if price_cell.is_null() {
        None
    } else {
        rules::check_price(price_cell)
            .map_err(|r| reasons.push(r))
            .ok()
    };

    match (date, price) {
        (Some(date), Some(price)) if reasons.is_empty() => RowOutcome::Valid(ValidatedRow {
            index: row.index,
            date,
            price,
            extras: layout
                .extras
                .iter()
                .map(|(i, name)| (name.clone(), row.cell(*i).clone()))
                .collect(),
        }),
        _ => RowOutcome::Rejected(RejectionRecord {
            index: row.index,
            reasons,
        }),
    }
}

/// Clean one sheet.
///
/// On success the surviving rows are typed (`NaiveDateTime` dates, positive
/// `f64` prices) by construction. When no row survives the error still
/// carries the full report.
pub fn clean_sheet(
    sheet: &RawSheet,
    columns: &ColumnNames,
    detail: ReportDetail,
) -> Result<CleanedSheet, SheetError> {
    let layout = ColumnLayout::resolve(sheet, columns)?;

    let mut rows: Vec<ValidatedRow> = Vec::with_capacity(sheet.rows.len());
    let mut rejections: Vec<RejectionRecord> = Vec::new();
    for outcome in sheet.rows.iter().map(|row| evaluate_row(row, &layout)) {
        match outcome {
            RowOutcome::Valid(r) => rows.push(r),
            RowOutcome::Rejected(r) => rejections.push(r),
        }
    }

    for r in &rejections {
        debug!(sheet = %sheet.name, row = r.index, reasons = %r.reasons_text(), "row rejected");
    }

    let report = ValidationReport::build(sheet.rows.len(), rejections, detail);

    let Some(series) = CleanedSeries::new(sheet.name.clone(), rows) else {
        warn!(sheet = %sheet.name, rows = report.rows_read, "no valid rows");
        return Err(SheetError::NoValidRows {
            sheet: sheet.name.clone(),
            report,
        });
    };

    info!(
        sheet = %sheet.name,
        kept = series.rows().len(),
        removed = report.removed,
        "sheet cleaned"
    );

    Ok(CleanedSheet { series, report })
}
