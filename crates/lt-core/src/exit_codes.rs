//! Exit codes for the lt-core binary.
//!
//! Scripts can tell failure classes apart without parsing stderr.

use lt_common::Error;

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Report and figure written
    Clean = 0,

    /// Configuration could not be read or is invalid
    ConfigError = 10,

    /// Source missing, unreachable, or of an unsupported format
    SourceError = 11,

    /// Data could not be parsed or corrections did not align
    DataError = 12,

    /// I/O error
    IoError = 13,

    /// Report or figure could not be produced
    ReportError = 14,

    /// Internal/unknown error
    InternalError = 99,
}

impl ExitCode {
    /// Map a pipeline error to its exit code.
    pub fn from_error(err: &Error) -> Self {
        match err {
            Error::Config(_) => ExitCode::ConfigError,
            Error::UnsupportedFormat { .. } | Error::SourceUnavailable { .. } => {
                ExitCode::SourceError
            }
            Error::MalformedData(_)
            | Error::CorrectionAlignment { .. }
            | Error::InvalidPeriod(_)
            | Error::Json(_) => ExitCode::DataError,
            Error::UnknownColumn(_) | Error::Report(_) => ExitCode::ReportError,
            Error::Io(_) => ExitCode::IoError,
            Error::NotLoaded => ExitCode::InternalError,
        }
    }

    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Clean)
    }

    /// Check if this exit code indicates an error requiring attention.
    pub fn is_error(self) -> bool {
        (self as i32) >= 10
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_map_to_families() {
        assert_eq!(
            ExitCode::from_error(&Error::Config("bad".into())),
            ExitCode::ConfigError
        );
        assert_eq!(
            ExitCode::from_error(&Error::unavailable("x.csv", "gone")),
            ExitCode::SourceError
        );
        assert_eq!(
            ExitCode::from_error(&Error::CorrectionAlignment {
                unmatched_days: vec![1],
                unknown_columns: vec![],
            }),
            ExitCode::DataError
        );
        assert_eq!(
            ExitCode::from_error(&Error::UnknownColumn("x".into())),
            ExitCode::ReportError
        );
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        assert_eq!(ExitCode::from_error(&Error::Io(io)), ExitCode::IoError);
    }

    #[test]
    fn success_and_error_classes() {
        assert!(ExitCode::Clean.is_success());
        assert!(!ExitCode::Clean.is_error());
        assert!(ExitCode::InternalError.is_error());
        assert_eq!(i32::from(ExitCode::ReportError), 14);
    }
}
