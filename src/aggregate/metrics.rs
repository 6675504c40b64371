//! Scalar summary metrics, computed straight from the cleaned series.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::CleanedSeries;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryMetrics {
    /// Price of the last row.
    pub current_price: f64,
    /// Last price minus first price.
    pub total_change: f64,
    /// `total_change / first price * 100`.
    pub percent_change: f64,
}

impl SummaryMetrics {
    /// Uses source row order, not the resampled bars. The first price is
    /// positive by construction so the division is always defined.
    pub fn from_series(series: &CleanedSeries) -> Self {
        let first = series.first().price;
        let last = series.last().price;
        let total_change = last - first;
        Self {
            current_price: last,
            total_change,
            percent_change: total_change / first * 100.0,
        }
    }
}

/// Descriptive stats for the dashboard header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesStats {
    pub rows: usize,
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
    pub min_price: f64,
    pub max_price: f64,
}

impl SeriesStats {
    pub fn from_series(series: &CleanedSeries) -> Self {
        let (first_day, last_day) = series.date_span();
        let (min_price, max_price) = series
            .rows()
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
                (lo.min(r.price), hi.max(r.price))
            });
        Self {
            rows: series.rows().len(),
            first_day,
            last_day,
            min_price,
            max_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValidatedRow;

    fn series(prices: &[(u32, f64)]) -> CleanedSeries {
        let rows = prices
            .iter()
            .enumerate()
            .map(|(i, &(day, price))| ValidatedRow {
                index: i + 1,
                date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap().and_hms_opt(0, 0, 0).unwrap(),
                price,
                extras: Vec::new(),
            })
            .collect();
        CleanedSeries::new("S", rows).unwrap()
    }

    #[test]
    fn metrics_basic() {
        let m = SummaryMetrics::from_series(&series(&[(1, 100.0), (2, 150.0)]));
        assert_eq!(m.current_price, 150.0);
        assert_eq!(m.total_change, 50.0);
        assert!((m.percent_change - 50.0).abs() < 1e-12);
    }

    #[test]
    fn metrics_follow_row_order_not_dates() {
        let m = SummaryMetrics::from_series(&series(&[(5, 80.0), (1, 100.0)]));
        assert_eq!(m.current_price, 100.0);
        assert_eq!(m.total_change, 20.0);
        assert!((m.percent_change - 25.0).abs() < 1e-12);
    }

    #[test]
    fn single_row_has_zero_change() {
        let m = SummaryMetrics::from_series(&series(&[(1, 42.0)]));
        assert_eq!(m.current_price, 42.0);
        assert_eq!(m.total_change, 0.0);
        assert_eq!(m.percent_change, 0.0);
    }

    #[test]
    fn stats_span_and_bounds() {
        let s = SeriesStats::from_series(&series(&[(3, 10.0), (1, 7.5), (9, 12.0)]));
        assert_eq!(s.rows, 3);
        assert_eq!(s.first_day, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(s.last_day, NaiveDate::from_ymd_opt(2024, 1, 9).unwrap());
        assert_eq!((s.min_price, s.max_price), (7.5, 12.0));
    }
}
