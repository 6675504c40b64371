use thiserror::Error;

use crate::clean::ValidationReport;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Per-sheet failures. These never abort the whole workbook.
#[derive(Debug, Clone, Error)]
pub enum SheetError {
    #[error("Sheet '{sheet}' does not contain required column(s): {}", .missing.join(", "))]
    MissingColumns { sheet: String, missing: Vec<String> },

    #[error("Sheet '{sheet}': no valid rows found ({} of {} rows removed)", .report.removed, .report.rows_read)]
    NoValidRows {
        sheet: String,
        report: ValidationReport,
    },
}

impl SheetError {
    pub fn sheet(&self) -> &str {
        match self {
            SheetError::MissingColumns { sheet, .. } | SheetError::NoValidRows { sheet, .. } => sheet,
        }
    }
}

impl From<SheetError> for AppError {
    fn from(err: SheetError) -> Self {
        AppError::new(3, err.to_string())
    }
}

/// Market-index fetch failures. Isolated per index by the overlay builder.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request for {index} failed: {source}")]
    Http {
        index: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request for {index} failed with status {status}")]
    Status { index: String, status: u16 },

    #[error("unexpected response for {index}: {detail}")]
    Decode { index: String, detail: String },

    #[error("no observations returned for {index}")]
    Empty { index: String },
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        AppError::new(4, err.to_string())
    }
}
