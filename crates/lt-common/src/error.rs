//! Error types for Loss Tracker.

use thiserror::Error;

/// Result type alias for Loss Tracker operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for Loss Tracker.
#[derive(Error, Debug)]
pub enum Error {
    // Source errors (10-19)
    #[error("unsupported source format: {source_path} (expected .csv or .json)")]
    UnsupportedFormat { source_path: String },

    #[error("source unavailable: {source_path}: {reason}")]
    SourceUnavailable { source_path: String, reason: String },

    // Data errors (20-29)
    #[error("malformed data: {0}")]
    MalformedData(String),

    #[error(
        "correction table does not align with base table: unmatched days {unmatched_days:?}, unknown columns {unknown_columns:?}"
    )]
    CorrectionAlignment {
        unmatched_days: Vec<i64>,
        unknown_columns: Vec<String>,
    },

    #[error("invalid period: {0}")]
    InvalidPeriod(String),

    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("no data loaded; call import_data first")]
    NotLoaded,

    // Configuration errors (30-39)
    #[error("configuration error: {0}")]
    Config(String),

    // Report errors (40-49)
    #[error("report error: {0}")]
    Report(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    pub fn code(&self) -> u32 {
        match self {
            Error::UnsupportedFormat { .. } => 10,
            Error::SourceUnavailable { .. } => 11,
            Error::MalformedData(_) => 20,
            Error::CorrectionAlignment { .. } => 21,
            Error::InvalidPeriod(_) => 22,
            Error::UnknownColumn(_) => 23,
            Error::NotLoaded => 24,
            Error::Config(_) => 30,
            Error::Report(_) => 40,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Convenience constructor for [`Error::SourceUnavailable`].
    pub fn unavailable(source_path: impl Into<String>, reason: impl ToString) -> Self {
        Error::SourceUnavailable {
            source_path: source_path.into(),
            reason: reason.to_string(),
        }
    }
}
