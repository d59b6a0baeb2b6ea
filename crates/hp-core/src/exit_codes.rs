//! Exit codes for the hp-core CLI.
//!
//! Exit codes communicate operation outcome without requiring output parsing.

use hp_common::Error;

/// Exit codes for hp-core operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Command completed
    Clean = 0,

    /// Lookup found nothing
    NotFound = 1,

    /// Configuration error
    ConfigError = 10,

    /// Model artifacts missing or inconsistent
    ArtifactError = 11,

    /// Prediction store error
    StoreError = 12,

    /// I/O error
    IoError = 13,

    /// Request could not be normalized or scored
    PredictionError = 14,

    /// Internal/unknown error
    InternalError = 99,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Check if this exit code indicates success.
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

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match err {
            Error::Config(_) => ExitCode::ConfigError,
            Error::Artifact(_) => ExitCode::ArtifactError,
            Error::Validation(_) | Error::Normalization(_) | Error::Scoring(_) => {
                ExitCode::PredictionError
            }
            Error::Store(_) | Error::StoreConnection(_) | Error::StoreUnreachable { .. } => {
                ExitCode::StoreError
            }
            Error::PredictionNotFound { .. } => ExitCode::NotFound,
            Error::Io(_) | Error::Server(_) => ExitCode::IoError,
            Error::Json(_) => ExitCode::InternalError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_not_an_error_code() {
        let code = ExitCode::from(&Error::PredictionNotFound { id: 3 });
        assert_eq!(code, ExitCode::NotFound);
        assert!(!code.is_error());
        assert!(!code.is_success());
    }

    #[test]
    fn startup_faults_are_errors() {
        assert_eq!(ExitCode::from(&Error::Artifact("x".into())).as_i32(), 11);
        assert!(ExitCode::from(&Error::StoreUnreachable {
            attempts: 3,
            reason: "x".into()
        })
        .is_error());
    }
}
