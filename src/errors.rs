//! Application error type.
//!
//! Store, config, CLI and export code return [`AppError`]. The pricing engine
//! never fails: malformed input degrades to zero or empty values instead.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // storage
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    // command-line input
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid month (expected YYYY-MM): {0}")]
    InvalidMonth(String),

    #[error("Invalid project mode: {0}")]
    InvalidMode(String),

    // configuration
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // export
    #[error("Export error: {0}")]
    Export(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type AppResult<T> = Result<T, AppError>;
