//! Typed series produced by the cleaner and consumed by the aggregator.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::domain::{Cell, ColumnNames, MarketIndex, RawRow, RawSheet};

/// A row whose required fields coerced cleanly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedRow {
    /// 1-based index of the source row.
    pub index: usize,
    pub date: NaiveDateTime,
    /// Always finite and > 0.
    pub price: f64,
    /// Non-required columns, carried through unexamined.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extras: Vec<(String, Cell)>,
}

/// Cleaned, type-coerced series for one sheet.
///
/// Never empty: the cleaner reports a sheet with zero valid rows as an error
/// instead of building one of these. Row order is the source order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanedSeries {
    name: String,
    rows: Vec<ValidatedRow>,
}

impl CleanedSeries {
    /// Returns `None` for an empty row set.
    pub fn new(name: impl Into<String>, rows: Vec<ValidatedRow>) -> Option<Self> {
        if rows.is_empty() {
            return None;
        }
        Some(Self {
            name: name.into(),
            rows,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rows(&self) -> &[ValidatedRow] {
        &self.rows
    }

    pub fn first(&self) -> &ValidatedRow {
        &self.rows[0]
    }

    pub fn last(&self) -> &ValidatedRow {
        &self.rows[self.rows.len() - 1]
    }

    /// `(timestamp, price)` pairs in source order, for line charts.
    pub fn points(&self) -> Vec<(NaiveDateTime, f64)> {
        self.rows.iter().map(|r| (r.date, r.price)).collect()
    }

    /// Earliest and latest calendar day present.
    pub fn date_span(&self) -> (NaiveDate, NaiveDate) {
        let mut lo = self.rows[0].date;
        let mut hi = lo;
        for r in &self.rows {
            lo = lo.min(r.date);
            hi = hi.max(r.date);
        }
        (lo.date(), hi.date())
    }

    /// Convert back into a raw sheet with canonical typed cells.
    ///
    /// Re-running the cleaner on the result yields the same rows.
    pub fn to_raw_sheet(&self, columns: &ColumnNames) -> RawSheet {
        let mut headers = vec![columns.date.clone(), columns.price.clone()];
        if let Some(first) = self.rows.first() {
            headers.extend(first.extras.iter().map(|(name, _)| name.clone()));
        }

        let rows = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let mut cells = vec![Cell::DateTime(r.date), Cell::Number(r.price)];
                cells.extend(r.extras.iter().map(|(_, c)| c.clone()));
                RawRow::new(i + 1, cells)
            })
            .collect();

        RawSheet {
            name: self.name.clone(),
            headers,
            rows,
        }
    }
}

/// Reference series for one market index. Not validated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexSeries {
    pub index: MarketIndex,
    pub points: Vec<(NaiveDate, f64)>,
}
