use crate::errors::{AppError, AppResult};
use crate::export::fs_utils::ensure_writable;
use crate::export::{XLSX_MIME, notify_export_success};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fs;
use std::path::PathBuf;

/// Bytes of a generated report with the metadata a share sheet needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedReport {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ExportedReport {
    pub fn xlsx(file_name: String, bytes: Vec<u8>) -> Self {
        Self {
            file_name,
            mime_type: XLSX_MIME.to_string(),
            bytes,
        }
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

/// Where finished reports go.
pub trait ShareTarget {
    fn share(&self, report: &ExportedReport) -> AppResult<PathBuf>;
}

/// Writes reports into a local directory.
pub struct DirectoryShare {
    pub dir: PathBuf,
    pub force: bool,
}

impl DirectoryShare {
    pub fn new(dir: impl Into<PathBuf>, force: bool) -> Self {
        Self {
            dir: dir.into(),
            force,
        }
    }
}

impl ShareTarget for DirectoryShare {
    fn share(&self, report: &ExportedReport) -> AppResult<PathBuf> {
        if report.file_name.contains(['/', '\\']) {
            return Err(AppError::Export(format!(
                "invalid report file name '{}'",
                report.file_name
            )));
        }

        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(&report.file_name);
        ensure_writable(&path, self.force)?;

        fs::write(&path, &report.bytes)?;
        notify_export_success("XLSX", &path);
        Ok(path)
    }
}
