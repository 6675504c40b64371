//! External and synthetic data sources.

pub mod overlay;
pub mod sample;
pub mod yahoo;

pub use overlay::{IndexSource, OverlaySet, fetch_overlays};
pub use sample::generate_demo_workbook;
pub use yahoo::YahooIndexSource;
