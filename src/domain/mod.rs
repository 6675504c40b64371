//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw container types (`Cell`, `RawRow`, `RawSheet`, `Workbook`)
//! - configuration and view-selection types (`ColumnNames`, `DashConfig`, `ViewRequest`)
//! - cleaned outputs (`ValidatedRow`, `CleanedSeries`) and overlay data (`IndexSeries`)

pub mod series;
pub mod types;

pub use series::*;
pub use types::*;
