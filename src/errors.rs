//! Unified application error type.
//! All modules (db, core, export, cli) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Malformed payload: {0}")]
    Payload(#[from] serde_json::Error),

    // ---------------------------
    // Lookup errors
    // ---------------------------
    #[error("Unknown location: {0}")]
    UnknownLocation(String),

    #[error("The following location codes do not exist: {}. Please create them on the receiving device first.", .0.join(", "))]
    MissingLocations(Vec<String>),

    #[error("Unknown employee: {0}")]
    UnknownUser(String),

    #[error("Unknown session: {0}")]
    UnknownSession(String),

    #[error("No user logged in. Run `faresheet user login <EMP_ID>` first.")]
    NotLoggedIn,

    // ---------------------------
    // Workflow errors
    // ---------------------------
    #[error("Invalid hand-off transition: {0}")]
    Handoff(String),

    #[error("Numbers do not match. Submission cancelled.")]
    VerificationMismatch,

    #[error("Nothing selected: {0}")]
    EmptySelection(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
