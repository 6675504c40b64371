//! Per-row checks.
//!
//! Each check is independent: a row collects every reason that applies
//! instead of stopping at the first failure.

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::Cell;
use crate::io::cells::{coerce_datetime, coerce_number};

/// Why a row was rejected.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectReason {
    /// One or more required cells are null.
    ContainsNull { columns: Vec<String> },
    /// The date cell is present but unparseable.
    InvalidDate { raw: String },
    /// The price cell could not be coerced to a number at all.
    PriceNotNumeric { raw: String },
    /// The price coerced but is NaN or infinite.
    PriceNotFinite { raw: String },
    /// The price coerced but is `<= 0`.
    PriceNotPositive { value: f64 },
}

impl RejectReason {
    pub fn is_null(&self) -> bool {
        matches!(self, RejectReason::ContainsNull { .. })
    }

    pub fn is_price(&self) -> bool {
        matches!(
            self,
            RejectReason::PriceNotNumeric { .. }
                | RejectReason::PriceNotFinite { .. }
                | RejectReason::PriceNotPositive { .. }
        )
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::ContainsNull { columns } => {
                write!(f, "contains null values ({})", columns.join(", "))
            }
            RejectReason::InvalidDate { raw } => write!(f, "invalid date format ('{raw}')"),
            RejectReason::PriceNotNumeric { raw } => {
                write!(f, "invalid price value: not numeric ('{raw}')")
            }
            RejectReason::PriceNotFinite { raw } => {
                write!(f, "invalid price value: not finite ('{raw}')")
            }
            RejectReason::PriceNotPositive { value } => {
                write!(f, "invalid price value: non-positive ({value})")
            }
        }
    }
}

/// Null check over the required `(column name, cell)` pairs.
pub fn check_nulls(required: &[(&str, &Cell)]) -> Option<RejectReason> {
    let columns: Vec<String> = required
        .iter()
        .filter(|(_, cell)| cell.is_null())
        .map(|(name, _)| name.to_string())
        .collect();
    if columns.is_empty() {
        None
    } else {
        Some(RejectReason::ContainsNull { columns })
    }
}

/// Date check for a non-null cell.
pub fn check_date(cell: &Cell) -> Result<NaiveDateTime, RejectReason> {
    coerce_datetime(cell).ok_or_else(|| RejectReason::InvalidDate {
        raw: cell.to_string(),
    })
}

/// Price check for a non-null cell.
pub fn check_price(cell: &Cell) -> Result<f64, RejectReason> {
    let value = coerce_number(cell).ok_or_else(|| RejectReason::PriceNotNumeric {
        raw: cell.to_string(),
    })?;
    if !value.is_finite() {
        return Err(RejectReason::PriceNotFinite {
            raw: cell.to_string(),
        });
    }
    if value <= 0.0 {
        return Err(RejectReason::PriceNotPositive { value });
    }
    Ok(value)
}
