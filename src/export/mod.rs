// src/export/mod.rs

mod fs_utils;
pub mod naming;
pub mod report;
pub mod share;
pub mod xlsx;

pub use report::{ReportBuilder, ReportRow, ReportSheet};
pub use share::{DirectoryShare, ExportedReport, ShareTarget};

use crate::ui::messages::success;
use serde::Serialize;
use std::path::Path;

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Shared completion message of every export.
pub(crate) fn notify_export_success(label: &str, path: &Path) {
    success(format!("{label} export completed: {}", path.display()));
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReportKind {
    /// Bus fare claim: values are KWD sub-totals.
    Fare,
    /// Hours worked per date.
    Timesheet,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Fare => "fare",
            ReportKind::Timesheet => "timesheet",
        }
    }

    /// Text of a signature cell in the footer.
    pub fn footer_label(&self, label: &str) -> String {
        match self {
            ReportKind::Fare => format!("{label}:"),
            ReportKind::Timesheet => label.to_string(),
        }
    }

    /// Number format of value cells (`None` = General).
    pub fn number_format(&self) -> Option<&'static str> {
        match self {
            ReportKind::Fare => None,
            ReportKind::Timesheet => Some("0.00"),
        }
    }
}
