//! Built-in FastAPI module catalog.
//!
//! Three static tables make up the catalog:
//!
//! - [`registry::REGISTRY`]: logical modules, inclusion predicates, guarded
//!   dependencies and templates
//! - [`layout::LAYOUT`]: one placement per module and structure
//! - the per-structure skeleton packages
//!
//! The tables are plain `'static` data; the generation engine validates them
//! once when it is constructed.

pub mod ids;
pub mod layout;
pub mod predicates;
pub mod registry;

use apismith_core::{
    application::{
        GenerationService, ImportVerifier, ScaffoldService, SweepService, ports::Filesystem,
        ports::ModuleCatalog,
    },
    domain::{LayoutEntry, LogicalModule, Structure},
    error::ApismithResult,
};

use crate::renderer::BuiltinRenderer;

/// The built-in catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalog;

impl ModuleCatalog for BuiltinCatalog {
    fn modules(&self) -> &[LogicalModule] {
        registry::REGISTRY
    }

    fn layout(&self) -> &[LayoutEntry] {
        layout::LAYOUT
    }

    fn skeleton_packages(&self, structure: Structure) -> &[&'static str] {
        layout::skeleton_packages(structure)
    }
}

/// Generation engine over the built-in catalog and renderer.
pub fn generation_service() -> ApismithResult<GenerationService> {
    GenerationService::new(Box::new(BuiltinCatalog), Box::new(BuiltinRenderer))
}

pub fn sweep_service() -> ApismithResult<SweepService> {
    Ok(SweepService::new(generation_service()?, ImportVerifier::new()?))
}

pub fn scaffold_service(filesystem: Box<dyn Filesystem>) -> ApismithResult<ScaffoldService> {
    Ok(ScaffoldService::new(
        generation_service()?,
        ImportVerifier::new()?,
        filesystem,
    ))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use apismith_core::domain::{AuthMethod, Database, Orm, ProjectConfig, TaskQueue};

    use super::*;

    #[test]
    fn catalog_passes_static_validation() {
        let engine = generation_service().unwrap();
        assert_eq!(engine.all_modules().count(), registry::REGISTRY.len());
    }

    #[test]
    fn every_module_has_exactly_one_layout_row() {
        let mut seen = HashSet::new();
        for entry in layout::LAYOUT {
            assert!(seen.insert(entry.module), "duplicate row for {}", entry.module);
        }
        for module in registry::REGISTRY {
            assert!(seen.contains(&module.id), "no layout for {}", module.id);
        }
        assert_eq!(seen.len(), registry::REGISTRY.len());
    }

    #[test]
    fn prestart_is_the_only_executable() {
        let executables: Vec<_> = registry::REGISTRY
            .iter()
            .filter(|m| m.permissions.executable_flag())
            .map(|m| m.id)
            .collect();
        assert_eq!(executables, vec![ids::PRESTART]);
    }

    #[test]
    fn minimal_project_selects_core_modules_only() {
        let config = ProjectConfig::builder()
            .name("svc")
            .database(Database::None)
            .build()
            .unwrap();
        let included = generation_service().unwrap().included(&config);

        assert!(included.contains(&ids::MAIN));
        assert!(included.contains(&ids::HEALTH_ROUTES));
        assert!(!included.contains(&ids::DATABASE));
        assert!(!included.contains(&ids::DEPS));
        assert!(!included.contains(&ids::USER_MODEL));
        assert!(!included.contains(&ids::PRESTART));
    }

    #[test]
    fn tortoise_uses_aerich_without_alembic_files() {
        let config = ProjectConfig::builder()
            .name("svc")
            .orm(Orm::Tortoise)
            .auth_method(AuthMethod::Jwt)
            .build()
            .unwrap();
        let included = generation_service().unwrap().included(&config);

        assert!(included.contains(&ids::PRESTART));
        assert!(!included.contains(&ids::MIGRATIONS_ENV));
        assert!(included.contains(&ids::USER_REPOSITORY));
        assert!(included.contains(&ids::DEPS));
    }

    #[test]
    fn task_routes_need_examples() {
        let without = ProjectConfig::builder()
            .name("svc")
            .task_queue(TaskQueue::Arq)
            .include_examples(false)
            .build()
            .unwrap();
        let included = generation_service().unwrap().included(&without);

        assert!(included.contains(&ids::WORKER));
        assert!(included.contains(&ids::JOBS));
        assert!(!included.contains(&ids::TASK_ROUTES));
    }
}
