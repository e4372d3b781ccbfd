//! Error types for modelpack-core.

use std::path::PathBuf;

/// Result type for packaging operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while packaging a notebook.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requirement cell is missing, duplicated, or malformed.
    #[error("Invalid requirements: {0}")]
    InvalidRequirements(String),

    /// The extracted model code violates the packaging contract.
    #[error("Invalid code format: {0}")]
    InvalidCodeFormat(String),

    /// The notebook uses an unsupported format version.
    #[error("Only notebook format version 4 (nbformat == 4) is supported, found {0}")]
    UnsupportedNotebookVersion(u32),

    /// Failed to read an input file.
    #[error("Failed to read file {path}: {message}")]
    ReadError { path: PathBuf, message: String },

    /// Failed to write an output file.
    #[error("Failed to write file {path}: {message}")]
    WriteError { path: PathBuf, message: String },

    /// Failed to parse the notebook JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
