//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `apismith-adapters` crate provides implementations.

use std::path::Path;

use crate::domain::{LayoutEntry, LogicalModule, RenderContext, Structure};
use crate::error::ApismithResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `apismith_adapters::filesystem::LocalFilesystem` (production)
/// - `apismith_adapters::filesystem::MemoryFilesystem` (testing)
///
/// Permissions are capability-based, not Unix-specific.
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> ApismithResult<()>;

    /// Write UTF-8 content to a file, replacing any previous content.
    fn write_file(&self, path: &Path, content: &str) -> ApismithResult<()>;

    /// Set file permissions.
    fn set_permissions(&self, path: &Path, executable: bool) -> ApismithResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> ApismithResult<()>;
}

/// Port for the module registry.
///
/// Implemented by `apismith_adapters::catalog::BuiltinCatalog`. The catalog
/// is static process-wide data; the generation engine validates it once.
pub trait ModuleCatalog: Send + Sync {
    /// Every logical module, in registry order.
    fn modules(&self) -> &[LogicalModule];

    /// Physical placement of every module.
    fn layout(&self) -> &[LayoutEntry];

    /// Package directories that always get an `__init__.py` under
    /// `structure`, even when empty.
    fn skeleton_packages(&self, structure: Structure) -> &[&'static str];
}

/// Port for module rendering.
///
/// Implemented by `apismith_adapters::renderer::BuiltinRenderer`.
pub trait ModuleRenderer: Send + Sync {
    /// Render `module` with its resolved context.
    fn render(&self, module: &LogicalModule, context: &RenderContext<'_>) -> ApismithResult<String>;
}
