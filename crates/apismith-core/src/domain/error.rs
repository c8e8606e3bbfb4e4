// ============================================================================
// domain/error.rs - CONFIGURATION, REGISTRY AND TREE ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (sweep results are collected across threads)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Configuration Errors (400-level equivalent)
    // ========================================================================
    #[error("invalid value '{value}' for {field}")]
    InvalidOption { field: &'static str, value: String },

    #[error("invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    #[error("{field} = '{value}' is not allowed: {reason}")]
    IncompatibleOptions {
        field: &'static str,
        value: String,
        reason: String,
    },

    // ========================================================================
    // Registry Consistency Errors (defects in the static tables)
    // ========================================================================
    #[error("module '{module}' depends on '{dependency}', which is not included")]
    MissingDependency { module: String, dependency: String },

    #[error("module '{module}' depends on unknown module '{dependency}'")]
    UnknownDependency { module: String, dependency: String },

    #[error("module '{module}' is registered more than once")]
    DuplicateModule { module: String },

    #[error("module '{module}' has no path under the {structure} structure")]
    UnmappedModule { module: String, structure: String },

    #[error("template for '{module}' referenced '{dependency}' without an active dependency")]
    UndeclaredDependency { module: String, dependency: String },

    // ========================================================================
    // Tree Errors
    // ========================================================================
    #[error("path collision at {path}: '{first}' and '{second}'")]
    PathCollision {
        path: String,
        first: String,
        second: String,
    },

    #[error("path must be relative and stay inside the project: {path}")]
    InvalidPath { path: String },

    #[error("rendering '{module}' failed: {reason}")]
    RenderFailed { module: String, reason: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidOption { field, value } => vec![
                format!("'{value}' is not a known {field}"),
                "Run `apismith new --help` to see accepted values".into(),
            ],
            Self::InvalidProjectName { reason, .. } => vec![
                format!("Project name rejected: {reason}"),
                "Start with a letter; use letters, digits, '-' and '_'".into(),
                "Examples: shop-api, inventory_service".into(),
            ],
            Self::IncompatibleOptions { field, reason, .. } => vec![
                format!("Change {field} or the option it conflicts with"),
                format!("Rule: {reason}"),
            ],
            Self::MissingDependency { .. }
            | Self::UnknownDependency { .. }
            | Self::DuplicateModule { .. }
            | Self::UnmappedModule { .. }
            | Self::UndeclaredDependency { .. }
            | Self::PathCollision { .. } => vec![
                "The built-in module catalog is inconsistent".into(),
                "Please report this issue together with the options you used".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidOption { .. } | Self::InvalidProjectName { .. } => {
                ErrorCategory::Validation
            }
            Self::IncompatibleOptions { .. } => ErrorCategory::Compatibility,
            Self::InvalidPath { .. } => ErrorCategory::Validation,
            _ => ErrorCategory::Internal,
        }
    }

    /// Whether this error signals a defect in the module catalog rather than
    /// bad user input.
    pub fn is_registry_defect(&self) -> bool {
        matches!(
            self,
            Self::MissingDependency { .. }
                | Self::UnknownDependency { .. }
                | Self::DuplicateModule { .. }
                | Self::UnmappedModule { .. }
                | Self::UndeclaredDependency { .. }
                | Self::PathCollision { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Compatibility,
    NotFound,
    Internal,
}
