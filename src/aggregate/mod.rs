//! Series aggregation: daily OHLC bars and summary metrics.
//!
//! Both consume a `CleanedSeries` and never mutate it.

pub mod metrics;
pub mod ohlc;

pub use metrics::{SeriesStats, SummaryMetrics};
pub use ohlc::{CandleDirection, CandleRange, OhlcBar, candle_ranges, daily_ohlc};
