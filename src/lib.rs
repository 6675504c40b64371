//! `stock-dash` library crate.
//!
//! The binary (`sdash`) is a thin wrapper around this library so that:
//!
//! - the load/clean/aggregate pipeline is testable without spawning processes
//! - the CLI report and the TUI share one code path
//! - code stays easy to navigate as the project grows

pub mod aggregate;
pub mod app;
pub mod clean;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod plot;
pub mod report;
pub mod tui;
