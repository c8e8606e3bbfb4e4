//! Unified error handling for apismith core.
//!
//! Wraps domain and application errors behind one type with user-actionable
//! suggestions and a display category.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for apismith core operations.
#[derive(Debug, Error, Clone)]
pub enum ApismithError {
    /// Configuration, registry, layout or rendering violations.
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Orchestration failures: persistence, verification gate, sweeps.
    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),

    /// Tool setup problems outside the project configuration.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl ApismithError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {message}"),
                "Run `apismith config path` to locate the active config file".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in apismith".into(),
                "Please report it together with the command you ran".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Compatibility => ErrorCategory::Compatibility,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Persistence failures may succeed on a second attempt; nothing else
    /// changes between runs.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Application(ApplicationError::FilesystemError { .. })
        )
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Compatibility,
    NotFound,
    Configuration,
    Verification,
    Internal,
}

/// Convenient result type alias.
pub type ApismithResult<T> = Result<T, ApismithError>;

/// Extension trait for adding context to errors.
pub trait Context<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> ApismithResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> ApismithResult<T> {
        self.map_err(|e| ApismithError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn filesystem_errors_are_retryable() {
        let err: ApismithError = ApplicationError::FilesystemError {
            path: PathBuf::from("out/app/main.py"),
            reason: "disk full".into(),
        }
        .into();
        assert!(err.is_retryable());
        assert_eq!(err.category(), ErrorCategory::Internal);
    }

    #[test]
    fn domain_category_is_mapped() {
        let err: ApismithError = DomainError::InvalidProjectName {
            name: "1x".into(),
            reason: "name must start with a letter".into(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert!(!err.is_retryable());
    }

    #[test]
    fn context_wraps_as_internal() {
        let result: Result<(), std::io::Error> =
            Err(std::io::Error::other("boom"));
        let err = result.context("reading catalog").unwrap_err();
        assert!(err.to_string().contains("reading catalog: boom"));
    }
}
