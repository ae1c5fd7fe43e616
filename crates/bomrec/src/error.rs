//! Reconciliation error types

use std::path::PathBuf;

use thiserror::Error;

/// Result type for reconciliation runs
pub type ReconcileResult<T> = std::result::Result<T, ReconcileError>;

/// Errors that abort a reconciliation run.
///
/// Row-level anomalies never surface here; only input validation and the
/// outer read/write steps can fail.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The DB sheet has no rows
    #[error("The DB file is empty or has no readable rows")]
    EmptyDatabase,

    /// The BOM sheet has no rows
    #[error("The BOM file is empty or has no readable rows")]
    EmptyBom,

    /// A file listing was given without the folder it came from
    #[error("A source path is required when a file listing is provided")]
    MissingSourcePath,

    /// The file could not be read from disk
    #[error("Cannot read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but its content is not a valid spreadsheet
    #[error("Cannot parse '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    /// Output could not be written
    #[error("Cannot write '{path}': {message}")]
    Write { path: PathBuf, message: String },

    /// Extension not handled by any reader/writer
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(PathBuf),
}

impl ReconcileError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReconcileError::Read {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        ReconcileError::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        ReconcileError::Write {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
