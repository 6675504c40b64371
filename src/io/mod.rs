//! Input/output helpers.
//!
//! - workbook loading + sheet screening (`workbook`)
//! - single-cell date/number coercion (`cells`)
//! - CSV/JSON exports (`export`)

pub mod cells;
pub mod export;
pub mod workbook;

pub use export::*;
pub use workbook::*;
