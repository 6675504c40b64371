//! Terminal reporting.
//!
//! The pipeline returns raw numbers; currency/percent strings are produced
//! here, at the presentation boundary only.

pub mod format;

pub use format::*;
