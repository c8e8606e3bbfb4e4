use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{
    entities::{common::Permissions, common::RelativePath, module::ModuleId},
    error::DomainError,
};

/// What put a file into the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "kind", content = "module")]
pub enum FileOrigin {
    /// Rendered from a registry module.
    Module(ModuleId),
    /// Empty `__init__.py` synthesized for a package directory.
    PackageMarker,
    /// Read back from disk for verification.
    Loaded,
}

impl FileOrigin {
    pub fn describe(&self) -> String {
        match self {
            Self::Module(id) => id.to_string(),
            Self::PackageMarker => "package marker".into(),
            Self::Loaded => "file on disk".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedFile {
    pub content: String,
    pub permissions: Permissions,
    pub origin: FileOrigin,
}

impl GeneratedFile {
    pub fn size(&self) -> usize {
        self.content.len()
    }
}

/// Ordered mapping path → rendered content.
///
/// Append-only while the engine builds it; callers outside the crate only
/// read it. Two trees built from the same configuration compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GeneratedTree {
    files: BTreeMap<RelativePath, GeneratedFile>,
}

impl GeneratedTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from files that already exist, e.g. a project on disk.
    pub fn from_files(
        files: impl IntoIterator<Item = (RelativePath, String)>,
    ) -> Result<Self, DomainError> {
        let mut tree = Self::new();
        for (path, content) in files {
            tree.insert(
                path,
                GeneratedFile {
                    content,
                    permissions: Permissions::default(),
                    origin: FileOrigin::Loaded,
                },
            )?;
        }
        Ok(tree)
    }

    /// Add a file, rejecting a second file on an occupied path.
    pub(crate) fn insert(
        &mut self,
        path: RelativePath,
        file: GeneratedFile,
    ) -> Result<(), DomainError> {
        if let Some(existing) = self.files.get(&path) {
            return Err(DomainError::PathCollision {
                path: path.to_string(),
                first: existing.origin.describe(),
                second: file.origin.describe(),
            });
        }
        self.files.insert(path, file);
        Ok(())
    }

    pub fn get(&self, path: &str) -> Option<&GeneratedFile> {
        RelativePath::try_new(path)
            .ok()
            .and_then(|p| self.files.get(&p))
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    pub fn files(&self) -> impl Iterator<Item = (&RelativePath, &GeneratedFile)> {
        self.files.iter()
    }

    pub fn paths(&self) -> impl Iterator<Item = &RelativePath> {
        self.files.keys()
    }

    /// Registry modules present in the tree.
    pub fn modules(&self) -> impl Iterator<Item = ModuleId> + '_ {
        self.files.values().filter_map(|f| match f.origin {
            FileOrigin::Module(id) => Some(id),
            _ => None,
        })
    }

    /// Path a registry module was written to.
    pub fn path_of(&self, module: ModuleId) -> Option<&RelativePath> {
        self.files
            .iter()
            .find(|(_, f)| f.origin == FileOrigin::Module(module))
            .map(|(p, _)| p)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn total_bytes(&self) -> usize {
        self.files.values().map(GeneratedFile::size).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module_file(id: &'static str) -> GeneratedFile {
        GeneratedFile {
            content: "x = 1\n".into(),
            permissions: Permissions::default(),
            origin: FileOrigin::Module(ModuleId::new(id)),
        }
    }

    #[test]
    fn collision_names_both_owners() {
        let mut tree = GeneratedTree::new();
        tree.insert("app/main.py".into(), module_file("app.main"))
            .unwrap();
        let err = tree
            .insert("app/main.py".into(), module_file("app.other"))
            .unwrap_err();
        match err {
            DomainError::PathCollision { first, second, .. } => {
                assert_eq!(first, "app.main");
                assert_eq!(second, "app.other");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn lookup_normalizes_path() {
        let tree = GeneratedTree::from_files([("app/main.py".into(), String::new())]).unwrap();
        assert!(tree.contains("./app/main.py"));
        assert!(!tree.contains("app/config.py"));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn iteration_is_sorted() {
        let tree = GeneratedTree::from_files([
            ("tests/__init__.py".into(), String::new()),
            ("app/main.py".into(), String::new()),
            ("README.md".into(), String::new()),
        ])
        .unwrap();
        let paths: Vec<_> = tree.paths().map(|p| p.as_str()).collect();
        assert_eq!(paths, vec!["README.md", "app/main.py", "tests/__init__.py"]);
    }
}
