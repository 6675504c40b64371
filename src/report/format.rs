//! Formatted terminal output for `sdash report` / `sdash ohlc`.
//!
//! We keep formatting code in one place so:
//! - the cleaning/aggregation code stays free of presentation concerns
//! - output changes are localized

use crate::aggregate::{OhlcBar, SeriesStats, SummaryMetrics};
use crate::app::pipeline::{Dashboard, SheetView};
use crate::domain::{CleanedSeries, ColumnNames, IndexSeries, ValidatedRow};

/// `1234.5` -> `$1,234.50`, `-50` -> `-$50.00`.
pub fn format_currency(v: f64) -> String {
    let cents = (v.abs() * 100.0).round() as u64;
    let sign = if v < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${}.{:02}", group_thousands(cents / 100), cents % 100)
}

/// `12.345` -> `12.35%`.
pub fn format_percent(v: f64) -> String {
    let s = format!("{v:.2}%");
    // Avoid "-0.00%".
    if s == "-0.00%" { "0.00%".to_string() } else { s }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Workbook-level summary: source, selectable sheets, skip warnings and failures.
pub fn format_dashboard_summary(dash: &Dashboard) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== sdash - {} ===\n", dash.source));
    out.push_str(&format!(
        "Columns: date='{}' price='{}'\n",
        dash.columns.date, dash.columns.price
    ));

    let names = dash.stock_names();
    if names.is_empty() {
        out.push_str("Stocks: (none)\n");
    } else {
        out.push_str(&format!("Stocks: {}\n", names.join(", ")));
    }

    for warning in &dash.skipped {
        out.push_str(&format!("warning: {warning}\n"));
    }
    for failure in &dash.failures {
        out.push_str(&format!("error: {failure}\n"));
    }
    out
}

pub fn format_metrics(m: &SummaryMetrics) -> String {
    format!(
        "Current Price: {}\nTotal Change: {}\nPercentage Change: {}\n",
        format_currency(m.current_price),
        format_currency(m.total_change),
        format_percent(m.percent_change),
    )
}

pub fn format_stats(s: &SeriesStats) -> String {
    format!(
        "Rows: {} | {} .. {} | low {} | high {}\n",
        s.rows,
        s.first_day,
        s.last_day,
        format_currency(s.min_price),
        format_currency(s.max_price),
    )
}

/// Last close and change over the window for each overlay.
pub fn format_overlays(overlays: &[IndexSeries]) -> String {
    let mut out = String::new();
    for o in overlays {
        let (Some(first), Some(last)) = (o.points.first(), o.points.last()) else {
            continue;
        };
        let change = (last.1 - first.1) / first.1 * 100.0;
        out.push_str(&format!(
            "{:<10} {:>12.2} ({})\n",
            o.index.display_name(),
            last.1,
            format_percent(change)
        ));
    }
    out
}

/// Full per-sheet section.
pub fn format_sheet_view(view: &SheetView) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n--- {} ---\n", view.name));

    if !view.report.lines.is_empty() {
        out.push_str("Validation:\n");
        for line in &view.report.lines {
            out.push_str(&format!("  {line}\n"));
        }
    }

    out.push_str(&format_metrics(&view.metrics));
    out.push_str(&format_stats(&view.stats));

    if !view.overlays.is_empty() {
        out.push_str("Indices:\n");
        out.push_str(&format_overlays(&view.overlays));
    }
    out
}

/// Daily bars as a fixed-width table.
pub fn format_ohlc_table(bars: &[OhlcBar]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<10} {:>12} {:>12} {:>12} {:>12} {:>10} {:>4}\n",
        "day", "open", "high", "low", "close", "range", "n"
    ));
    out.push_str(&format!(
        "{:-<10} {:-<12} {:-<12} {:-<12} {:-<12} {:-<10} {:-<4}\n",
        "", "", "", "", "", "", ""
    ));
    for b in bars {
        out.push_str(&format!(
            "{:<10} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>+10.2} {:>4}\n",
            b.day.format("%Y-%m-%d").to_string(),
            b.open,
            b.high,
            b.low,
            b.close,
            b.range(),
            b.observations,
        ));
    }
    out
}

/// Header of the cleaned-rows table: date, price, then carried-through columns.
pub fn row_headers(series: &CleanedSeries, columns: &ColumnNames) -> Vec<String> {
    let mut out = vec![columns.date.clone(), columns.price.clone()];
    out.extend(series.first().extras.iter().map(|(name, _)| name.clone()));
    out
}

pub fn row_cells(row: &ValidatedRow) -> Vec<String> {
    let mut out = vec![
        row.date.format("%Y-%m-%d %H:%M:%S").to_string(),
        format!("{:.2}", row.price),
    ];
    out.extend(row.extras.iter().map(|(_, cell)| cell.to_string()));
    out
}

/// Cleaned rows as a fixed-width table, columns sized to their content.
pub fn format_rows_table(series: &CleanedSeries, columns: &ColumnNames) -> String {
    let headers = row_headers(series, columns);
    let body: Vec<Vec<String>> = series.rows().iter().map(row_cells).collect();
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            body.iter()
                .filter_map(|r| r.get(i))
                .map(|c| c.chars().count())
                .fold(h.chars().count(), usize::max)
        })
        .collect();

    let mut out = String::new();
    push_table_row(&mut out, &headers, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_table_row(&mut out, &rule, &widths);
    for row in &body {
        push_table_row(&mut out, row, &widths);
    }
    out
}

// First column left-aligned, the rest right-aligned.
fn push_table_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(i, &w)| {
            let c = cells.get(i).map(String::as_str).unwrap_or("");
            if i == 0 { format!("{c:<w$}") } else { format!("{c:>w$}") }
        })
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MarketIndex;
    use chrono::NaiveDate;

    #[test]
    fn currency_strings() {
        assert_eq!(format_currency(1234.5), "$1,234.50");
        assert_eq!(format_currency(-50.0), "-$50.00");
        assert_eq!(format_currency(0.004), "$0.00");
        assert_eq!(format_currency(-0.001), "$0.00");
        assert_eq!(format_currency(1_000_000.0), "$1,000,000.00");
    }

    #[test]
    fn percent_strings() {
        assert_eq!(format_percent(12.346), "12.35%");
        assert_eq!(format_percent(-10.0), "-10.00%");
        assert_eq!(format_percent(-0.0001), "0.00%");
    }

    #[test]
    fn metrics_block() {
        let m = SummaryMetrics {
            current_price: 110.0,
            total_change: 10.0,
            percent_change: 10.0,
        };
        assert_eq!(
            format_metrics(&m),
            "Current Price: $110.00\nTotal Change: $10.00\nPercentage Change: 10.00%\n"
        );
    }

    #[test]
    fn ohlc_table_rows() {
        let bars = vec![OhlcBar {
            day: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            open: 10.0,
            high: 12.0,
            low: 8.0,
            close: 8.0,
            observations: 3,
        }];
        let table = format_ohlc_table(&bars);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[2].starts_with("2024-01-01"));
        assert!(lines[2].contains("-2.00"));
        assert!(lines[2].trim_end().ends_with('3'));
    }

    #[test]
    fn rows_table_shows_extras() {
        use crate::domain::Cell;

        let at = |h| NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(h, 30, 0).unwrap();
        let series = CleanedSeries::new(
            "ACME",
            vec![
                ValidatedRow {
                    index: 1,
                    date: at(9),
                    price: 100.0,
                    extras: vec![("Volume".to_string(), Cell::text("10"))],
                },
                ValidatedRow {
                    index: 3,
                    date: at(15),
                    price: 104.5,
                    extras: vec![("Volume".to_string(), Cell::Empty)],
                },
            ],
        )
        .unwrap();

        let table = format_rows_table(&series, &ColumnNames::default());
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Date "));
        assert!(lines[0].ends_with("Price  Volume"));
        assert_eq!(lines[2], "2024-01-02 09:30:00  100.00      10");
        assert_eq!(lines[3], "2024-01-02 15:30:00  104.50");
    }

    #[test]
    fn overlay_lines() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        let text = format_overlays(&[IndexSeries {
            index: MarketIndex::Sp500,
            points: vec![(d(1), 100.0), (d(2), 110.0)],
        }]);
        assert!(text.starts_with("S&P 500"));
        assert!(text.contains("10.00%"));
    }
}
