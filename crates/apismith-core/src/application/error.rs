//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::Finding;
use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// A renderer adapter failed outside the domain's own checks.
    #[error("Rendering '{module}' failed: {reason}")]
    RenderingFailed { module: String, reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Project already exists at target location.
    #[error("Project already exists at {path}")]
    ProjectExists { path: PathBuf },

    /// Rollback failed (best-effort cleanup failed).
    #[error("Rollback failed for {path}: {reason}")]
    RollbackFailed { path: PathBuf, reason: String },

    /// Strict mode refused to persist a tree with unresolved references.
    #[error("{} unresolved reference(s) in the generated tree", .findings.len())]
    VerificationFailed { findings: Vec<Finding> },

    /// A sweep specification with an empty axis or no valid combination.
    #[error("Invalid sweep specification: {reason}")]
    InvalidSweep { reason: String },

    /// The dedicated sweep thread pool could not be built.
    #[error("Could not start worker pool: {reason}")]
    ThreadPool { reason: String },

    /// A project configuration file could not be read or parsed.
    #[error("Could not load {path}: {reason}")]
    LoadFailed { path: PathBuf, reason: String },

    /// Validation failed (application-level, not domain).
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "The operation is safe to retry".into(),
            ],
            Self::ProjectExists { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Use --force to overwrite (destructive)".into(),
                "Choose a different project name".into(),
            ],
            Self::VerificationFailed { findings } => {
                let mut hints: Vec<String> = findings
                    .iter()
                    .take(5)
                    .map(|f| f.to_string())
                    .collect();
                hints.push("Run without --strict to write the project anyway".into());
                hints
            }
            Self::InvalidSweep { reason } => vec![
                format!("Sweep rejected: {reason}"),
                "Every axis needs at least one value".into(),
            ],
            Self::LoadFailed { path, .. } => vec![
                format!("Check the syntax of {}", path.display()),
                "Supported formats: .toml and .json".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FilesystemError { .. } | Self::RollbackFailed { .. } => ErrorCategory::Internal,
            Self::RenderingFailed { .. } | Self::ThreadPool { .. } => ErrorCategory::Internal,
            Self::VerificationFailed { .. } => ErrorCategory::Verification,
            Self::InvalidSweep { .. } | Self::ValidationFailed(_) => ErrorCategory::Validation,
            Self::ProjectExists { .. } => ErrorCategory::Validation,
            Self::LoadFailed { .. } => ErrorCategory::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FindingReason;

    #[test]
    fn verification_failure_lists_findings() {
        let err = ApplicationError::VerificationFailed {
            findings: vec![Finding {
                file: "app/main.py".into(),
                line: 4,
                raw: "from app.cache import cache".into(),
                reason: FindingReason::Unresolved {
                    module: "app.cache".into(),
                },
            }],
        };
        assert_eq!(err.category(), ErrorCategory::Verification);
        assert!(err.to_string().starts_with("1 unresolved"));
        assert!(err.suggestions()[0].contains("app/main.py:4"));
    }
}
