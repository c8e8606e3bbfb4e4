use std::collections::{HashMap, HashSet};

use crate::domain::{
    entities::module::{LogicalModule, ModuleId},
    error::DomainError,
    layout::LayoutResolver,
    value_objects::Structure,
};

/// Static checks over the module catalog and layout table.
///
/// Run once when the generation engine is built, so a defect in the tables
/// surfaces before any configuration is looked at.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_catalog(
        modules: &[LogicalModule],
        layout: &LayoutResolver,
    ) -> Result<(), DomainError> {
        let ids = Self::unique_ids(modules)?;

        for module in modules {
            Self::validate_dependencies(module, &ids)?;
            for structure in Structure::ALL {
                layout.resolve(module.id, *structure)?;
            }
        }

        for structure in Structure::ALL {
            Self::validate_paths(modules, layout, *structure)?;
        }
        Ok(())
    }

    fn unique_ids(modules: &[LogicalModule]) -> Result<HashSet<ModuleId>, DomainError> {
        let mut ids = HashSet::with_capacity(modules.len());
        for module in modules {
            if !ids.insert(module.id) {
                return Err(DomainError::DuplicateModule {
                    module: module.id.to_string(),
                });
            }
        }
        Ok(ids)
    }

    fn validate_dependencies(
        module: &LogicalModule,
        known: &HashSet<ModuleId>,
    ) -> Result<(), DomainError> {
        match module
            .dependencies
            .iter()
            .find(|d| !known.contains(&d.target))
        {
            Some(dep) => Err(DomainError::UnknownDependency {
                module: module.id.to_string(),
                dependency: dep.target.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Two catalog modules must never share a path in the same structure,
    /// whether or not any configuration would include both.
    fn validate_paths(
        modules: &[LogicalModule],
        layout: &LayoutResolver,
        structure: Structure,
    ) -> Result<(), DomainError> {
        let mut owners: HashMap<String, ModuleId> = HashMap::with_capacity(modules.len());
        for module in modules {
            let path = layout.resolve(module.id, structure)?;
            if let Some(first) = owners.insert(path.to_string(), module.id) {
                return Err(DomainError::PathCollision {
                    path: format!("{path} ({structure})"),
                    first: first.to_string(),
                    second: module.id.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::{
            common::Permissions,
            module::{Dependency, always},
            render_context::RenderContext,
        },
        layout::LayoutEntry,
    };

    fn empty(_: &RenderContext<'_>) -> Result<String, DomainError> {
        Ok(String::new())
    }

    const fn module(id: &'static str, dependencies: &'static [Dependency]) -> LogicalModule {
        LogicalModule {
            id: ModuleId::new(id),
            description: "",
            include: always,
            dependencies,
            template: empty,
            permissions: Permissions::read_write(),
        }
    }

    static NEEDS_CONFIG: &[Dependency] = &[Dependency::always(ModuleId::new("app.config"))];

    #[test]
    fn consistent_catalog_passes() {
        let modules = [module("app.config", &[]), module("app.main", NEEDS_CONFIG)];
        let layout = LayoutResolver::new(&[
            LayoutEntry::per_structure(
                ModuleId::new("app.config"),
                "app/config.py",
                "app/core/config.py",
                "app/config.py",
            ),
            LayoutEntry::shared(ModuleId::new("app.main"), "app/main.py"),
        ])
        .unwrap();
        assert!(DomainValidator::validate_catalog(&modules, &layout).is_ok());
    }

    #[test]
    fn unknown_dependency_is_reported() {
        let modules = [module("app.main", NEEDS_CONFIG)];
        let layout =
            LayoutResolver::new(&[LayoutEntry::shared(ModuleId::new("app.main"), "app/main.py")])
                .unwrap();
        let err = DomainValidator::validate_catalog(&modules, &layout).unwrap_err();
        assert!(matches!(err, DomainError::UnknownDependency { .. }));
    }

    #[test]
    fn unmapped_module_is_reported() {
        let modules = [module("app.config", &[])];
        let layout = LayoutResolver::new(&[]).unwrap();
        let err = DomainValidator::validate_catalog(&modules, &layout).unwrap_err();
        assert!(matches!(err, DomainError::UnmappedModule { .. }));
    }

    #[test]
    fn per_structure_collision_is_reported() {
        let modules = [module("core.security", &[]), module("app.security", &[])];
        let layout = LayoutResolver::new(&[
            LayoutEntry::per_structure(
                ModuleId::new("core.security"),
                "app/core/security.py",
                "app/core/security.py",
                "app/security.py",
            ),
            LayoutEntry::shared(ModuleId::new("app.security"), "app/security.py"),
        ])
        .unwrap();
        let err = DomainValidator::validate_catalog(&modules, &layout).unwrap_err();
        match err {
            DomainError::PathCollision { path, .. } => assert!(path.contains("flat")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn duplicate_id_is_reported() {
        let modules = [module("app.config", &[]), module("app.config", &[])];
        let layout = LayoutResolver::new(&[]).unwrap();
        let err = DomainValidator::validate_catalog(&modules, &layout).unwrap_err();
        assert!(matches!(err, DomainError::DuplicateModule { .. }));
    }
}
