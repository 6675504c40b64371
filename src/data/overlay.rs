//! Market-index overlays with per-index failure isolation.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::domain::{IndexSeries, MarketIndex};
use crate::error::FetchError;

/// Anything that can produce a daily close series for an index.
pub trait IndexSource {
    fn fetch(&self, index: MarketIndex, start: NaiveDate, end: NaiveDate) -> Result<IndexSeries, FetchError>;
}

/// Overlay data for one view: what loaded and what did not.
#[derive(Debug, Default)]
pub struct OverlaySet {
    /// Successfully fetched series, in requested order.
    pub series: Vec<IndexSeries>,
    pub failures: Vec<(MarketIndex, FetchError)>,
}

impl OverlaySet {
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn failed_names(&self) -> Vec<&'static str> {
        self.failures.iter().map(|(i, _)| i.display_name()).collect()
    }
}

/// Fetch every requested index. A failure only drops that index.
pub fn fetch_overlays(
    source: &dyn IndexSource,
    indices: &[MarketIndex],
    start: NaiveDate,
    end: NaiveDate,
) -> OverlaySet {
    let mut set = OverlaySet::default();
    for &index in indices {
        match source.fetch(index, start, end) {
            Ok(series) => {
                info!(index = %index, points = series.points.len(), "index overlay loaded");
                set.series.push(series);
            }
            Err(err) => {
                warn!(index = %index, "index overlay unavailable: {err}");
                set.failures.push((index, err));
            }
        }
    }
    set
}
