//! Loaders for inputs that live on disk: project configuration files and
//! already-generated project trees.

mod project_file;
mod tree;

pub use project_file::{ProjectFile, load_project_file};
pub use tree::DiskTreeLoader;

use std::path::Path;

/// Normalise a filesystem path to forward slashes.
fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

fn load_failed(path: &Path, reason: impl Into<String>) -> apismith_core::error::ApismithError {
    apismith_core::application::ApplicationError::LoadFailed {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
    .into()
}
