//! Daily OHLC resampling.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::CleanedSeries;

/// One calendar-day aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OhlcBar {
    pub day: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    /// Exported as `price` so line and candle outputs share a field name.
    #[serde(rename = "price")]
    pub close: f64,
    pub observations: usize,
}

impl OhlcBar {
    fn start(day: NaiveDate, price: f64) -> Self {
        Self {
            day,
            open: price,
            high: price,
            low: price,
            close: price,
            observations: 1,
        }
    }

    fn push(&mut self, price: f64) {
        self.high = self.high.max(price);
        self.low = self.low.min(price);
        self.close = price;
        self.observations += 1;
    }

    /// Signed `close - open`.
    pub fn range(&self) -> f64 {
        self.close - self.open
    }

    pub fn direction(&self) -> CandleDirection {
        if self.range() >= 0.0 {
            CandleDirection::Up
        } else {
            CandleDirection::Down
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CandleDirection {
    Up,
    Down,
}

/// Signed per-bar magnitude for the range strip under a candle chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandleRange {
    pub day: NaiveDate,
    pub value: f64,
    pub direction: CandleDirection,
}

/// Resample a cleaned series into one bar per calendar day.
///
/// Rows are stable-sorted by timestamp before grouping, so open/close follow
/// chronological order and rows sharing a timestamp keep their source order.
/// Days without observations produce no bar. Output is ascending by day.
pub fn daily_ohlc(series: &CleanedSeries) -> Vec<OhlcBar> {
    let mut ordered: Vec<_> = series.rows().iter().collect();
    ordered.sort_by_key(|r| r.date);

    let mut bars: Vec<OhlcBar> = Vec::new();
    for row in ordered {
        let day = row.date.date();
        match bars.last_mut() {
            Some(bar) if bar.day == day => bar.push(row.price),
            _ => bars.push(OhlcBar::start(day, row.price)),
        }
    }
    bars
}

pub fn candle_ranges(bars: &[OhlcBar]) -> Vec<CandleRange> {
    bars.iter()
        .map(|b| CandleRange {
            day: b.day,
            value: b.range(),
            direction: b.direction(),
        })
        .collect()
}
