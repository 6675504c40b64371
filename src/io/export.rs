//! Export cleaned series, OHLC bars and full sheet views.
//!
//! Nothing is ever written back to the source workbook; exports go to
//! explicitly requested paths only.

use std::fs::File;
use std::path::Path;

use tracing::info;

use crate::aggregate::OhlcBar;
use crate::app::pipeline::SheetView;
use crate::domain::{CleanedSeries, ColumnNames};
use crate::error::AppError;

/// Write the cleaned series as CSV using the configured column names.
pub fn write_series_csv(path: &Path, series: &CleanedSeries, columns: &ColumnNames) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(4, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    let mut header = vec![columns.date.clone(), columns.price.clone()];
    header.extend(series.first().extras.iter().map(|(name, _)| name.clone()));
    writer
        .write_record(&header)
        .map_err(|e| AppError::new(4, format!("Failed to write export CSV header: {e}")))?;

    for row in series.rows() {
        let mut record = vec![
            row.date.format("%Y-%m-%d %H:%M:%S").to_string(),
            row.price.to_string(),
        ];
        record.extend(row.extras.iter().map(|(_, cell)| cell.to_string()));
        writer
            .write_record(&record)
            .map_err(|e| AppError::new(4, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(4, format!("Failed to flush export CSV: {e}")))?;
    info!(path = %path.display(), rows = series.rows().len(), "series exported");
    Ok(())
}

/// Write daily bars as CSV (`day,open,high,low,price,observations`).
pub fn write_ohlc_csv(path: &Path, bars: &[OhlcBar]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(4, format!("Failed to create OHLC CSV '{}': {e}", path.display())))?;

    for bar in bars {
        writer
            .serialize(bar)
            .map_err(|e| AppError::new(4, format!("Failed to write OHLC CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(4, format!("Failed to flush OHLC CSV: {e}")))?;
    info!(path = %path.display(), bars = bars.len(), "ohlc exported");
    Ok(())
}

/// Write a complete sheet view (series, report, chart data, metrics) as JSON.
pub fn write_view_json(path: &Path, view: &SheetView) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create view JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, view)
        .map_err(|e| AppError::new(4, format!("Failed to write view JSON: {e}")))?;

    info!(path = %path.display(), sheet = %view.name, "view exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::daily_ohlc;
    use crate::domain::{Cell, ValidatedRow};
    use chrono::NaiveDate;

    fn series() -> CleanedSeries {
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap().and_hms_opt(0, 0, 0).unwrap();
        CleanedSeries::new(
            "ACME",
            vec![
                ValidatedRow {
                    index: 1,
                    date: d(1),
                    price: 10.0,
                    extras: vec![("Volume".to_string(), Cell::Number(100.0))],
                },
                ValidatedRow {
                    index: 2,
                    date: d(1),
                    price: 12.5,
                    extras: vec![("Volume".to_string(), Cell::Empty)],
                },
            ],
        )
        .unwrap()
    }

    #[test]
    fn series_csv_uses_configured_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_series_csv(&path, &series(), &ColumnNames::new("date", "price")).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "date,price,Volume");
        assert_eq!(lines[1], "2024-01-01 00:00:00,10,100");
        assert_eq!(lines[2], "2024-01-01 00:00:00,12.5,");
    }

    #[test]
    fn ohlc_csv_renames_close() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bars.csv");
        write_ohlc_csv(&path, &daily_ohlc(&series())).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "day,open,high,low,price,observations");
        assert_eq!(lines[1], "2024-01-01,10.0,12.5,10.0,12.5,2");
    }
}
