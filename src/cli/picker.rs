//! Interactive workbook picker.
//!
//! Used when no `-f` is given: list the workbooks found under the current
//! directory and let the user choose one by number or type a path.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::io::SPREADSHEET_EXTENSIONS;

const SEARCH_DEPTH: usize = 3;

/// Prompt on stdin/stdout for a workbook path.
pub fn prompt_for_workbook() -> Result<PathBuf, AppError> {
    let files = discover_workbooks(Path::new("."), SEARCH_DEPTH);
    if files.is_empty() {
        return Err(AppError::new(
            2,
            "No workbooks found here. Pass one with `-f <file.xlsx>` or try `--demo`.",
        ));
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    choose_workbook(&files, &mut stdin.lock(), &mut stdout)
}

/// Selection loop over an arbitrary reader/writer pair.
pub fn choose_workbook(files: &[PathBuf], input: &mut impl BufRead, out: &mut impl Write) -> Result<PathBuf, AppError> {
    let io_err = |e: io::Error| AppError::new(2, format!("Prompt I/O failed: {e}"));

    writeln!(out, "Found {} workbook(s):", files.len()).map_err(io_err)?;
    for (idx, path) in files.iter().enumerate() {
        writeln!(out, "{:>3}) {}", idx + 1, display_path(path)).map_err(io_err)?;
    }

    loop {
        write!(out, "Pick 1-{} or enter a path (q to quit): ", files.len()).map_err(io_err)?;
        out.flush().map_err(io_err)?;

        let mut line = String::new();
        if input.read_line(&mut line).map_err(io_err)? == 0 {
            return Err(AppError::new(2, "No selection made. Pass a workbook with `-f <file>`."));
        }

        let answer = line.trim();
        if answer.eq_ignore_ascii_case("q") {
            return Err(AppError::new(2, "Canceled."));
        }

        let candidate = match answer.parse::<usize>() {
            Ok(n) if (1..=files.len()).contains(&n) => files[n - 1].clone(),
            Ok(n) => {
                writeln!(out, "No entry {n}.").map_err(io_err)?;
                continue;
            }
            Err(_) => PathBuf::from(answer),
        };

        match check_workbook_path(&candidate) {
            Ok(path) => return Ok(path),
            Err(err) => writeln!(out, "{err}").map_err(io_err)?,
        }
    }
}

/// The path must be an existing file with a supported extension.
pub fn check_workbook_path(path: &Path) -> Result<PathBuf, AppError> {
    if !path.is_file() {
        return Err(AppError::new(2, format!("Workbook not found: {}", path.display())));
    }
    if !has_workbook_extension(path) {
        return Err(AppError::new(
            2,
            format!("Not a supported workbook: {}", path.display()),
        ));
    }
    Ok(path.to_path_buf())
}

/// Workbooks under `root`, sorted by display path.
pub fn discover_workbooks(root: &Path, max_depth: usize) -> Vec<PathBuf> {
    let mut found = Vec::new();
    walk(root, max_depth, &mut found);
    found.sort_by_key(|p| display_path(p));
    found
}

fn walk(dir: &Path, depth_left: usize, found: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(kind) = entry.file_type() else {
            continue;
        };
        if kind.is_dir() {
            let hidden_or_build = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with('.') || n == "target" || n == "node_modules");
            if depth_left > 0 && !hidden_or_build {
                walk(&path, depth_left - 1, found);
            }
        } else if kind.is_file() && has_workbook_extension(&path) {
            found.push(path);
        }
    }
}

fn has_workbook_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .is_some_and(|e| e == "csv" || SPREADSHEET_EXTENSIONS.contains(&e.as_str()))
}

fn display_path(path: &Path) -> String {
    path.strip_prefix("./").unwrap_or(path).display().to_string()
}
