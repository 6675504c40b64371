//! Validation report: rejected rows plus the human-readable lines shown to users.

use serde::Serialize;

use crate::clean::rules::RejectReason;
use crate::domain::ReportDetail;

/// A rejected row: its 1-based source index and every reason that applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectionRecord {
    pub index: usize,
    pub reasons: Vec<RejectReason>,
}

impl RejectionRecord {
    /// `"reason, reason"`.
    pub fn reasons_text(&self) -> String {
        self.reasons
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Diagnostics for one sheet.
///
/// `lines` is empty when nothing was removed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub rows_read: usize,
    pub removed: usize,
    pub rejections: Vec<RejectionRecord>,
    pub lines: Vec<String>,
}

impl ValidationReport {
    pub fn build(rows_read: usize, rejections: Vec<RejectionRecord>, detail: ReportDetail) -> Self {
        let removed = rejections.len();
        let mut lines = Vec::new();

        if removed > 0 {
            lines.push(format!("Removed {removed} invalid rows"));
            if detail == ReportDetail::Itemized {
                for r in &rejections {
                    lines.push(format!("Row {}: {}", r.index, r.reasons_text()));
                }
            }
            lines.push(format!("Total rows removed: {removed}"));
        }

        Self {
            rows_read,
            removed,
            rejections,
            lines,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.removed == 0
    }

    pub fn rows_kept(&self) -> usize {
        self.rows_read - self.removed
    }
}
