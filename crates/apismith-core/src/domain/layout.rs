//! Layout resolution: where a logical module lives and how other modules
//! import it.
//!
//! The resolver is the only place that knows about structure-specific
//! paths. Everything it computes is a pure function of the layout table and
//! the structure, so one resolver is shared by every generation and sweep
//! worker without locking.

use std::collections::HashMap;

use crate::domain::{
    entities::{common::RelativePath, module::ModuleId},
    error::DomainError,
    value_objects::Structure,
};

/// Top-level directories that hold importable Python packages.
pub const PYTHON_ROOTS: &[&str] = &["app", "tests"];

/// Directory that holds one package per business domain under DomainDriven.
const DOMAINS_DIR: &str = "app/domains";

/// Physical placement of a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Same path in every structure.
    Shared(&'static str),
    PerStructure {
        layered: &'static str,
        domain_driven: &'static str,
        flat: &'static str,
    },
}

impl Placement {
    pub const fn path_for(&self, structure: Structure) -> &'static str {
        match (self, structure) {
            (Self::Shared(path), _) => *path,
            (Self::PerStructure { layered, .. }, Structure::Layered) => *layered,
            (Self::PerStructure { domain_driven, .. }, Structure::DomainDriven) => *domain_driven,
            (Self::PerStructure { flat, .. }, Structure::Flat) => *flat,
        }
    }
}

/// One row of the layout table.
#[derive(Debug, Clone, Copy)]
pub struct LayoutEntry {
    pub module: ModuleId,
    pub placement: Placement,
}

impl LayoutEntry {
    pub const fn shared(module: ModuleId, path: &'static str) -> Self {
        Self {
            module,
            placement: Placement::Shared(path),
        }
    }

    pub const fn per_structure(
        module: ModuleId,
        layered: &'static str,
        domain_driven: &'static str,
        flat: &'static str,
    ) -> Self {
        Self {
            module,
            placement: Placement::PerStructure {
                layered,
                domain_driven,
                flat,
            },
        }
    }
}

/// Maps `(module, structure)` to a physical path and to import strings.
#[derive(Debug, Clone)]
pub struct LayoutResolver {
    placements: HashMap<ModuleId, Placement>,
}

impl LayoutResolver {
    /// Index the layout table. A module listed twice is rejected.
    pub fn new(entries: &[LayoutEntry]) -> Result<Self, DomainError> {
        let mut placements = HashMap::with_capacity(entries.len());
        for entry in entries {
            if placements.insert(entry.module, entry.placement).is_some() {
                return Err(DomainError::DuplicateModule {
                    module: entry.module.to_string(),
                });
            }
        }
        Ok(Self { placements })
    }

    /// Physical file of `module` under `structure`.
    pub fn resolve(
        &self,
        module: ModuleId,
        structure: Structure,
    ) -> Result<RelativePath, DomainError> {
        let placement =
            self.placements
                .get(&module)
                .ok_or_else(|| DomainError::UnmappedModule {
                    module: module.to_string(),
                    structure: structure.to_string(),
                })?;
        RelativePath::try_new(placement.path_for(structure))
    }

    /// Absolute dotted module path (`app.core.security`).
    pub fn module_path(&self, module: ModuleId, structure: Structure) -> Result<String, DomainError> {
        self.resolve(module, structure).map(|p| dotted_module_path(&p))
    }

    /// Import expression `from` uses to reach `to`.
    ///
    /// Absolute unless the structure is DomainDriven, `from` is a Python file
    /// inside a domain package and `to` sits in that same package or below
    /// it; then a single-dot relative form is produced.
    pub fn import_string(
        &self,
        from: ModuleId,
        to: ModuleId,
        structure: Structure,
    ) -> Result<String, DomainError> {
        let source = self.resolve(from, structure)?;
        let target = self.resolve(to, structure)?;
        let absolute = dotted_module_path(&target);

        if structure != Structure::DomainDriven || !source.is_python() || !target.is_python() {
            return Ok(absolute);
        }

        let (Some(source_domain), Some(target_domain)) = (domain_of(&source), domain_of(&target))
        else {
            return Ok(absolute);
        };
        if source_domain != target_domain {
            return Ok(absolute);
        }

        let Some(package) = source.parent() else {
            return Ok(absolute);
        };
        let package_dotted = package.as_str().replace('/', ".");
        match absolute
            .strip_prefix(&package_dotted)
            .and_then(|rest| rest.strip_prefix('.'))
        {
            Some(rest) if !rest.is_empty() => Ok(format!(".{rest}")),
            _ => Ok(absolute),
        }
    }
}

/// `app/core/security.py` → `app.core.security`,
/// `app/models/__init__.py` → `app.models`.
///
/// Non-Python paths are returned unchanged.
pub fn dotted_module_path(path: &RelativePath) -> String {
    let raw = path.as_str();
    let Some(stem) = raw.strip_suffix(".py") else {
        return raw.to_string();
    };
    let stem = stem.strip_suffix("/__init__").unwrap_or(stem);
    stem.replace('/', ".")
}

/// Name of the `app/domains/<domain>` package a path belongs to.
fn domain_of(path: &RelativePath) -> Option<&str> {
    let rest = path.as_str().strip_prefix(DOMAINS_DIR)?.strip_prefix('/')?;
    let (domain, _) = rest.split_once('/')?;
    Some(domain)
}
