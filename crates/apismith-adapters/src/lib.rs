//! Infrastructure adapters for apismith.
//!
//! This crate implements the ports defined in `apismith_core::application::ports`:
//! the built-in FastAPI module catalog and its templates, the renderer,
//! filesystems, and loaders for project files and on-disk trees.

pub mod catalog;
pub mod filesystem;
pub mod loader;
pub mod renderer;
pub(crate) mod templates;

// Re-export commonly used adapters
pub use catalog::{BuiltinCatalog, generation_service, scaffold_service, sweep_service};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use loader::{DiskTreeLoader, ProjectFile, load_project_file};
pub use renderer::BuiltinRenderer;
