//! XLS error types

use thiserror::Error;

/// Result type for XLS operations
pub type XlsResult<T> = std::result::Result<T, XlsError>;

/// Errors that can occur while reading an XLS workbook
#[derive(Debug, Error)]
pub enum XlsError {
    /// IO error (also covers CFB container errors)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid file format
    #[error("Invalid XLS format: {0}")]
    InvalidFormat(String),

    /// Unsupported BIFF version
    #[error("Unsupported XLS version: {0}")]
    UnsupportedVersion(String),

    /// The workbook is encrypted
    #[error("Workbook is password protected")]
    Encrypted,

    /// The workbook lists no worksheet
    #[error("No worksheet found in the workbook")]
    NoSheets,

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),
}
