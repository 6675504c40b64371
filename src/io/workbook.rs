//! Workbook loading and sheet screening.
//!
//! A container is read into one `RawSheet` per named sheet. Any container-level
//! failure (missing file, corrupt archive, unreadable sheet) is fatal for the
//! whole run; per-sheet problems are reported and the sheet is skipped.
//!
//! - spreadsheets (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`) via calamine
//! - `.csv` as a one-sheet container named after the file stem

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use tracing::{debug, info, warn};

use crate::domain::{Cell, ColumnNames, RawRow, RawSheet, Workbook};
use crate::error::{AppError, SheetError};
use crate::io::cells::excel_serial_to_datetime;

pub const SPREADSHEET_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Load every sheet of the container at `path`.
pub fn load_workbook(path: &Path) -> Result<Workbook, AppError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let source = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    info!(path = %path.display(), "loading workbook");

    let sheets = if ext == "csv" {
        vec![read_csv_sheet(path)?]
    } else if SPREADSHEET_EXTENSIONS.contains(&ext.as_str()) {
        read_spreadsheet(path)?
    } else {
        return Err(AppError::new(
            2,
            format!(
                "Unsupported file type '{}'. Expected one of: csv, {}.",
                path.display(),
                SPREADSHEET_EXTENSIONS.join(", ")
            ),
        ));
    };

    info!(sheets = sheets.len(), "workbook loaded");
    Ok(Workbook { source, sheets })
}

fn read_spreadsheet(path: &Path) -> Result<Vec<RawSheet>, AppError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| {
        AppError::new(2, format!("Failed to open workbook '{}': {e}", path.display()))
    })?;

    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook.worksheet_range(&name).map_err(|e| {
            AppError::new(2, format!("Failed to read sheet '{name}': {e}"))
        })?;
        let rows = range
            .rows()
            .map(|row| row.iter().map(cell_from_data).collect())
            .collect();
        sheets.push(sheet_from_grid(name, rows));
    }
    Ok(sheets)
}

fn read_csv_sheet(path: &Path) -> Result<RawSheet, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| {
            AppError::new(2, format!("Failed to read CSV line {}: {e}", idx + 1))
        })?;
        rows.push(record.iter().map(Cell::text).collect());
    }

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Sheet1".to_string());
    Ok(sheet_from_grid(name, rows))
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::text(s.as_str()),
        Data::Float(v) => Cell::Number(*v),
        Data::Int(v) => Cell::Number(*v as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => match excel_serial_to_datetime(dt.as_f64()) {
            Some(d) => Cell::DateTime(d),
            None => Cell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::text(s.as_str()),
        Data::Error(e) => Cell::Error(e.to_string()),
    }
}

/// Build a sheet from a grid whose first row is the header.
///
/// Header text is trimmed (and a UTF-8 BOM stripped) so an Excel-exported
/// `"\u{feff}Date"` still matches. Blank headers get pandas-style
/// `Unnamed: N` names. Trailing all-empty rows are dropped.
pub fn sheet_from_grid(name: String, mut grid: Vec<Vec<Cell>>) -> RawSheet {
    while grid.last().is_some_and(|row| row.iter().all(Cell::is_null)) {
        grid.pop();
    }

    let mut rows_iter = grid.into_iter();
    let headers = rows_iter
        .next()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(i, c)| header_name(i, c))
                .collect()
        })
        .unwrap_or_default();

    let rows = rows_iter
        .enumerate()
        .map(|(i, cells)| RawRow::new(i + 1, cells))
        .collect();

    RawSheet { name, headers, rows }
}

fn header_name(idx: usize, cell: &Cell) -> String {
    let text = cell.to_string();
    let text = text.trim().trim_start_matches('\u{feff}').trim();
    if text.is_empty() {
        format!("Unnamed: {idx}")
    } else {
        text.to_string()
    }
}

/// Split sheets into those carrying both required columns and skip warnings
/// for the rest. Sheet order is preserved.
pub fn partition_sheets(workbook: &Workbook, columns: &ColumnNames) -> (Vec<RawSheet>, Vec<SheetError>) {
    let mut usable = Vec::new();
    let mut skipped = Vec::new();

    for sheet in &workbook.sheets {
        let missing = columns.missing_in(sheet);
        if missing.is_empty() {
            debug!(sheet = %sheet.name, rows = sheet.rows.len(), "sheet accepted");
            usable.push(sheet.clone());
        } else {
            let err = SheetError::MissingColumns {
                sheet: sheet.name.clone(),
                missing,
            };
            warn!("{err}");
            skipped.push(err);
        }
    }

    (usable, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn t(s: &str) -> Cell {
        Cell::text(s)
    }

    #[test]
    fn grid_header_and_row_numbering() {
        let sheet = sheet_from_grid(
            "S".to_string(),
            vec![
                vec![t("\u{feff}Date "), t("Price"), Cell::Empty],
                vec![t("2024-01-01"), t("1")],
                vec![t("2024-01-02"), t("2")],
                vec![Cell::Empty, Cell::Empty],
            ],
        );
        assert_eq!(sheet.headers, vec!["Date", "Price", "Unnamed: 2"]);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0].index, 1);
        assert_eq!(sheet.rows[1].index, 2);
    }

    #[test]
    fn empty_grid_has_no_headers() {
        let sheet = sheet_from_grid("Blank".to_string(), Vec::new());
        assert!(sheet.headers.is_empty());
        assert!(sheet.rows.is_empty());
    }

    #[test]
    fn partition_skips_sheets_missing_columns() {
        let wb = Workbook {
            source: "t".to_string(),
            sheets: vec![
                sheet_from_grid("Good".to_string(), vec![vec![t("Date"), t("Price")]]),
                sheet_from_grid("NoPrice".to_string(), vec![vec![t("Date"), t("Close")]]),
                sheet_from_grid("Lower".to_string(), vec![vec![t("date"), t("price")]]),
            ],
        };
        let (usable, skipped) = partition_sheets(&wb, &ColumnNames::default());
        assert_eq!(usable.len(), 1);
        assert_eq!(usable[0].name, "Good");
        assert_eq!(skipped.len(), 2);
        assert_eq!(
            skipped[0].to_string(),
            "Sheet 'NoPrice' does not contain required column(s): Price"
        );
        assert_eq!(skipped[1].sheet(), "Lower");

        let (usable, _) = partition_sheets(&wb, &ColumnNames::new("date", "price"));
        assert_eq!(usable.len(), 1);
        assert_eq!(usable[0].name, "Lower");
    }

    #[test]
    fn csv_is_a_single_sheet_container() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ACME.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "Date,Price,Note").unwrap();
        writeln!(f, "2024-01-01,10,").unwrap();
        writeln!(f, "2024-01-02,  ,x").unwrap();
        drop(f);

        let wb = load_workbook(&path).unwrap();
        assert_eq!(wb.source, "ACME.csv");
        assert_eq!(wb.sheets.len(), 1);
        let sheet = &wb.sheets[0];
        assert_eq!(sheet.name, "ACME");
        assert_eq!(sheet.headers, vec!["Date", "Price", "Note"]);
        assert_eq!(sheet.rows[1].cell(1), &Cell::Empty);
        assert_eq!(sheet.rows[1].cell(2), &t("x"));
    }

    #[test]
    fn unreadable_container_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.xlsx");
        std::fs::write(&path, b"definitely not a zip archive").unwrap();
        let err = load_workbook(&path).unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let err = load_workbook(&dir.path().join("notes.txt")).unwrap_err();
        assert!(err.to_string().contains("Unsupported file type"));
    }
}
