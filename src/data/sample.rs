//! Synthetic demo workbook.
//!
//! Deterministic for a given seed. The sheets exercise every loader and
//! cleaner path:
//!
//! - `ACME`: intraday random walk, duplicate days, a handful of dirty rows
//! - `GLOBEX`: one clean close per day, US-style dates and `$`-formatted prices
//! - `INITECH`: nothing survives cleaning
//! - `Notes`: no price column, skipped by the loader

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{Cell, ColumnNames, RawRow, RawSheet, Workbook};
use crate::error::AppError;

const ACME_DAYS: usize = 30;
const GLOBEX_DAYS: usize = 45;
/// Observation times for the intraday sheet.
const SESSION_TIMES: [(u32, u32); 3] = [(9, 30), (12, 0), (16, 0)];
/// Daily log-return volatility of the random walk.
const DAILY_VOL: f64 = 0.018;

pub fn generate_demo_workbook(seed: u64, columns: &ColumnNames) -> Result<Workbook, AppError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, DAILY_VOL)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let start = NaiveDate::from_ymd_opt(2024, 1, 2)
        .ok_or_else(|| AppError::new(4, "Invalid demo start date."))?;

    let sheets = vec![
        acme_sheet(&mut rng, &noise, start, columns),
        globex_sheet(&mut rng, &noise, start, columns),
        initech_sheet(columns),
        notes_sheet(),
    ];

    Ok(Workbook {
        source: format!("demo (seed {seed})"),
        sheets,
    })
}

fn acme_sheet(rng: &mut StdRng, noise: &Normal<f64>, start: NaiveDate, columns: &ColumnNames) -> RawSheet {
    let mut price = 100.0_f64;
    let mut grid: Vec<Vec<Cell>> = Vec::new();

    for day in trading_days(start, ACME_DAYS) {
        for &(h, m) in &SESSION_TIMES {
            // Daily vol spread over the three sessions.
            price *= (noise.sample(rng) / 3.0_f64.sqrt()).exp();
            let at = day.and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap_or_default());
            let volume = rng.gen_range(10_000..250_000) as f64;
            grid.push(vec![
                Cell::DateTime(at),
                Cell::Number((price * 100.0).round() / 100.0),
                Cell::Number(volume),
            ]);
        }
    }

    // Dirty rows at fixed positions so the report is stable across seeds.
    let dirty = [
        (4, vec![Cell::text("2024-01-04"), Cell::Empty, Cell::Empty]),
        (11, vec![Cell::text("not a date"), Cell::text("101.5"), Cell::Empty]),
        (19, vec![Cell::text("2024-01-10"), Cell::text("n/a"), Cell::Empty]),
        (27, vec![Cell::text("2024-01-12"), Cell::Number(-3.0), Cell::Empty]),
        (40, vec![Cell::Error("#N/A".to_string()), Cell::text("abc"), Cell::Empty]),
    ];
    for (at, cells) in dirty {
        let at = at.min(grid.len());
        grid.insert(at, cells);
    }

    build_sheet("ACME", vec![columns.date.clone(), columns.price.clone(), "Volume".to_string()], grid)
}

fn globex_sheet(rng: &mut StdRng, noise: &Normal<f64>, start: NaiveDate, columns: &ColumnNames) -> RawSheet {
    let mut price = rng.gen_range(1_000.0..1_500.0_f64);
    let grid = trading_days(start, GLOBEX_DAYS)
        .into_iter()
        .map(|day| {
            price *= noise.sample(rng).exp();
            vec![
                Cell::text(day.format("%m/%d/%Y").to_string()),
                Cell::text(format_dollars(price)),
            ]
        })
        .collect();

    build_sheet("GLOBEX", vec![columns.date.clone(), columns.price.clone()], grid)
}

fn initech_sheet(columns: &ColumnNames) -> RawSheet {
    let grid = vec![
        vec![Cell::text("TBD"), Cell::text("12.0")],
        vec![Cell::text("2024-02-30"), Cell::Number(15.0)],
        vec![Cell::text("2024-03-01"), Cell::Number(0.0)],
        vec![Cell::Empty, Cell::Empty],
        vec![Cell::text("2024-03-04"), Cell::Bool(true)],
    ];
    build_sheet("INITECH", vec![columns.date.clone(), columns.price.clone()], grid)
}

fn notes_sheet() -> RawSheet {
    let grid = vec![
        vec![Cell::text("Synthetic data for demonstration only.")],
        vec![Cell::text("Prices are a seeded random walk.")],
    ];
    build_sheet("Notes", vec!["Note".to_string()], grid)
}

fn build_sheet(name: &str, headers: Vec<String>, grid: Vec<Vec<Cell>>) -> RawSheet {
    RawSheet {
        name: name.to_string(),
        headers,
        rows: grid
            .into_iter()
            .enumerate()
            .map(|(i, cells)| RawRow::new(i + 1, cells))
            .collect(),
    }
}

fn trading_days(start: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let mut days = Vec::with_capacity(count);
    let mut d = start;
    while days.len() < count {
        if !matches!(d.weekday(), Weekday::Sat | Weekday::Sun) {
            days.push(d);
        }
        d += Duration::days(1);
    }
    days
}

/// `1234.5` -> `"$1,234.50"`.
fn format_dollars(v: f64) -> String {
    let cents = (v * 100.0).round() as i64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::new();
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("${grouped}.{:02}", cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clean::clean_sheet;
    use crate::domain::ReportDetail;
    use crate::io::partition_sheets;

    #[test]
    fn same_seed_same_workbook() {
        let cols = ColumnNames::default();
        let a = generate_demo_workbook(7, &cols).unwrap();
        let b = generate_demo_workbook(7, &cols).unwrap();
        let c = generate_demo_workbook(8, &cols).unwrap();
        assert_eq!(a, b);
        assert_ne!(a.sheets[0], c.sheets[0]);
    }

    #[test]
    fn sheets_cover_each_outcome() {
        let cols = ColumnNames::default();
        let wb = generate_demo_workbook(42, &cols).unwrap();
        let (usable, skipped) = partition_sheets(&wb, &cols);
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].sheet(), "Notes");

        let names: Vec<_> = usable.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["ACME", "GLOBEX", "INITECH"]);

        let acme = clean_sheet(&usable[0], &cols, ReportDetail::Itemized).unwrap();
        assert_eq!(acme.report.removed, 5);
        assert_eq!(acme.series.rows().len(), ACME_DAYS * SESSION_TIMES.len());

        let globex = clean_sheet(&usable[1], &cols, ReportDetail::Itemized).unwrap();
        assert!(globex.report.is_clean());
        assert_eq!(globex.series.rows().len(), GLOBEX_DAYS);

        assert!(clean_sheet(&usable[2], &cols, ReportDetail::Itemized).is_err());
    }

    #[test]
    fn custom_column_names_flow_through() {
        let cols = ColumnNames::new("date", "price");
        let wb = generate_demo_workbook(1, &cols).unwrap();
        assert_eq!(wb.sheets[0].headers[..2], ["date".to_string(), "price".to_string()]);
    }

    #[test]
    fn dollars_are_grouped() {
        assert_eq!(format_dollars(1234.5), "$1,234.50");
        assert_eq!(format_dollars(999.999), "$1,000.00");
        assert_eq!(format_dollars(12.0), "$12.00");
    }

    #[test]
    fn weekends_are_skipped() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(); // Friday
        let days = trading_days(start, 2);
        assert_eq!(days[1], NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
    }
}
