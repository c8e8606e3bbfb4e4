//! Load an existing project directory as a [`GeneratedTree`] so the import
//! verifier can check a project that is already on disk.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, instrument};
use walkdir::{DirEntry, WalkDir};

use apismith_core::{
    domain::{GeneratedTree, RelativePath},
    error::ApismithResult,
};

use super::{load_failed, normalize_path};

/// Directories that never hold project sources.
const SKIPPED_DIRS: &[&str] = &[
    ".git",
    ".venv",
    "venv",
    "__pycache__",
    ".mypy_cache",
    ".pytest_cache",
    ".ruff_cache",
    "node_modules",
];

fn is_skipped(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

/// Reads every UTF-8 file below a project root.
#[derive(Debug, Clone)]
pub struct DiskTreeLoader {
    root: PathBuf,
}

impl DiskTreeLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn load(&self) -> ApismithResult<GeneratedTree> {
        if !self.root.is_dir() {
            return Err(load_failed(&self.root, "not a directory"));
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_skipped(e));

        for entry in walker {
            let entry = entry.map_err(|e| load_failed(&self.root, e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let abs_path = entry.path();
            let rel = abs_path
                .strip_prefix(&self.root)
                .map_err(|e| load_failed(abs_path, e.to_string()))?;
            let rel = normalize_path(&rel.to_string_lossy());

            let bytes = fs::read(abs_path).map_err(|e| load_failed(abs_path, e.to_string()))?;
            let Ok(content) = String::from_utf8(bytes) else {
                debug!(path = %rel, "skipping non-UTF-8 file");
                continue;
            };

            let path = RelativePath::try_new(&rel)?;
            files.push((path, content));
        }

        let tree = GeneratedTree::from_files(files)?;
        debug!(count = tree.len(), "project tree loaded");
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_project(files: &[(&str, &[u8])]) -> TempDir {
        let temp = TempDir::new().unwrap();
        for (rel_path, content) in files {
            let full = temp.path().join(rel_path);
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(full, content).unwrap();
        }
        temp
    }

    #[test]
    fn loads_nested_files_with_forward_slashes() {
        let project = make_project(&[
            ("app/__init__.py", b""),
            ("app/api/routes/health.py", b"from fastapi import APIRouter\n"),
            ("pyproject.toml", b"[project]\n"),
        ]);

        let tree = DiskTreeLoader::new(project.path()).load().unwrap();

        assert_eq!(tree.len(), 3);
        assert!(tree.contains("app/api/routes/health.py"));
        assert_eq!(tree.get("pyproject.toml").unwrap().content, "[project]\n");
    }

    #[test]
    fn skips_tool_directories() {
        let project = make_project(&[
            ("app/main.py", b"app = None\n"),
            (".venv/lib/site.py", b"import os\n"),
            ("app/__pycache__/main.cpython-312.pyc", b"\x00\x01"),
            (".git/HEAD", b"ref: refs/heads/main\n"),
        ]);

        let tree = DiskTreeLoader::new(project.path()).load().unwrap();

        let paths: Vec<_> = tree.paths().map(|p| p.as_str().to_string()).collect();
        assert_eq!(paths, vec!["app/main.py"]);
    }

    #[test]
    fn skips_binary_files() {
        let project = make_project(&[
            ("app/main.py", b"app = None\n"),
            ("static/logo.png", &[0x89, 0x50, 0x4e, 0x47, 0xff, 0xfe]),
        ]);

        let tree = DiskTreeLoader::new(project.path()).load().unwrap();
        assert!(!tree.contains("static/logo.png"));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn missing_root_is_a_load_error() {
        let err = DiskTreeLoader::new("/absolutely/does/not/exist")
            .load()
            .unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }
}
