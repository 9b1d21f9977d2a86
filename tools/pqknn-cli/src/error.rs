//! Error types for the CLI.

use std::path::PathBuf;

use thiserror::Error;

/// CLI-specific result type.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
pub enum CliError {
    /// Model error.
    #[error("model error: {0}")]
    Model(#[from] pqknn::PqError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed row in a dataset file.
    #[error("line {line}: {message}")]
    Dataset {
        /// 1-based line number of the offending row.
        line: u64,
        /// What was wrong with it.
        message: String,
    },

    /// Invalid input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// File not found.
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    /// Parse error.
    #[error("parse error: {0}")]
    Parse(String),
}
