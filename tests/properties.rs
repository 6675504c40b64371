//! Property tests for cleaning and daily resampling.
//!
//! Uses proptest to verify:
//! 1. Cleaning partitions rows: kept + removed == read
//! 2. Cleaning is idempotent on its own output
//! 3. Daily bars bracket open/close, cover every row, ascend by day

use chrono::{Duration, NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use stock_dash::aggregate::{SummaryMetrics, daily_ohlc};
use stock_dash::clean::clean_sheet;
use stock_dash::domain::{Cell, CleanedSeries, ColumnNames, RawRow, RawSheet, ReportDetail, ValidatedRow};

fn base() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
}

// ── Strategies ───────────────────────────────────────────────────────

fn arb_timestamp() -> impl Strategy<Value = NaiveDateTime> {
    (0i64..30, 0i64..86_400).prop_map(|(d, s)| base() + Duration::days(d) + Duration::seconds(s))
}

fn arb_price() -> impl Strategy<Value = f64> {
    (0.01..5000.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

/// Whatever a hand-maintained workbook might hold in a required column.
fn arb_cell() -> impl Strategy<Value = Cell> {
    prop_oneof![
        Just(Cell::Empty),
        Just(Cell::Error("#N/A".to_string())),
        (-100.0..1000.0_f64).prop_map(Cell::Number),
        arb_timestamp().prop_map(Cell::DateTime),
        arb_price().prop_map(|p| Cell::text(format!("${p}"))),
        "[a-z0-9/ .-]{0,8}".prop_map(Cell::text),
    ]
}

fn arb_sheet() -> impl Strategy<Value = RawSheet> {
    prop::collection::vec((arb_cell(), arb_cell()), 0..40).prop_map(|cells| RawSheet {
        name: "P".to_string(),
        headers: vec!["Date".to_string(), "Price".to_string()],
        rows: cells
            .into_iter()
            .enumerate()
            .map(|(i, (d, p))| RawRow::new(i + 1, vec![d, p]))
            .collect(),
    })
}

fn arb_series() -> impl Strategy<Value = CleanedSeries> {
    prop::collection::vec((arb_timestamp(), arb_price()), 1..60).prop_map(|rows| {
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(i, (date, price))| ValidatedRow {
                index: i + 1,
                date,
                price,
                extras: Vec::new(),
            })
            .collect();
        CleanedSeries::new("P", rows).unwrap()
    })
}

// ── 1-2. Cleaning ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn cleaning_accounts_for_every_row(sheet in arb_sheet()) {
        let columns = ColumnNames::default();
        let (kept, report) = match clean_sheet(&sheet, &columns, ReportDetail::Itemized) {
            Ok(cleaned) => (cleaned.series.rows().len(), cleaned.report),
            Err(stock_dash::error::SheetError::NoValidRows { report, .. }) => (0, report),
            Err(other) => return Err(TestCaseError::fail(format!("unexpected error: {other}"))),
        };
        prop_assert_eq!(report.rows_read, sheet.rows.len());
        prop_assert_eq!(kept + report.removed, report.rows_read);
        prop_assert_eq!(report.rejections.len(), report.removed);
        for r in &report.rejections {
            prop_assert!(!r.reasons.is_empty());
        }
    }

    #[test]
    fn cleaning_is_idempotent(sheet in arb_sheet()) {
        let columns = ColumnNames::default();
        if let Ok(first) = clean_sheet(&sheet, &columns, ReportDetail::Summary) {
            for row in first.series.rows() {
                prop_assert!(row.price.is_finite() && row.price > 0.0);
            }

            let again = clean_sheet(&first.series.to_raw_sheet(&columns), &columns, ReportDetail::Summary);
            prop_assert!(again.is_ok());
            let again = again.unwrap();
            prop_assert!(again.report.is_clean());
            prop_assert_eq!(again.series.points(), first.series.points());
        }
    }
}

// ── 3. Daily OHLC ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn daily_bars_are_consistent(series in arb_series()) {
        let bars = daily_ohlc(&series);

        prop_assert_eq!(bars.iter().map(|b| b.observations).sum::<usize>(), series.rows().len());
        for pair in bars.windows(2) {
            prop_assert!(pair[0].day < pair[1].day);
        }
        for b in &bars {
            prop_assert!(b.low <= b.open && b.open <= b.high);
            prop_assert!(b.low <= b.close && b.close <= b.high);
            prop_assert_eq!(b.range(), b.close - b.open);
        }
    }

    #[test]
    fn metrics_follow_source_order(series in arb_series()) {
        let m = SummaryMetrics::from_series(&series);
        let first = series.first().price;
        prop_assert_eq!(m.current_price, series.last().price);
        prop_assert_eq!(m.total_change, series.last().price - first);
        prop_assert!((m.percent_change - m.total_change / first * 100.0).abs() < 1e-9);
    }
}
