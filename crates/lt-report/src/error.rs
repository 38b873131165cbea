//! Error types for report generation.

use thiserror::Error;

/// Errors that can occur while building or rendering a report.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Requested column is not a category of the table
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// Arrow table construction or formatting failed
    #[error("table formatting failed: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Drawing backend failure
    #[error("failed to render figure: {0}")]
    Render(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

impl From<ReportError> for lt_common::Error {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::UnknownColumn(name) => lt_common::Error::UnknownColumn(name),
            ReportError::Io(e) => lt_common::Error::Io(e),
            other => lt_common::Error::Report(other.to_string()),
        }
    }
}
