//! Generation Service - the composition engine.
//!
//! Turns a validated [`ProjectConfig`] into a [`GeneratedTree`]:
//! 1. Select the included modules (registry order)
//! 2. Check closure over guard-true dependencies
//! 3. Resolve physical paths for the configured structure
//! 4. Resolve import strings for every active dependency
//! 5. Render each module
//! 6. Assemble the tree, rejecting path collisions, and add package markers
//!
//! This is the only place where layout and feature decisions meet. It does
//! no I/O; persistence is [`ScaffoldService`](super::ScaffoldService)'s job.

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;
use tracing::{debug, instrument};

use crate::{
    application::ports::{ModuleCatalog, ModuleRenderer},
    domain::{
        DomainError, DomainValidator, FileOrigin, GeneratedFile, GeneratedTree, LayoutResolver,
        LogicalModule, ModuleId, PYTHON_ROOTS, Permissions, ProjectConfig, RelativePath,
        RenderContext, ResolvedDependency, Structure,
    },
    error::ApismithResult,
};

const PACKAGE_MARKER: &str = "__init__.py";

/// One catalog module as seen by a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModulePlan {
    pub id: ModuleId,
    pub description: &'static str,
    pub included: bool,
    pub path: RelativePath,
    /// Guard-true dependencies, whether or not the module is included.
    pub dependencies: Vec<ModuleId>,
}

pub struct GenerationService {
    catalog: Box<dyn ModuleCatalog>,
    renderer: Box<dyn ModuleRenderer>,
    layout: LayoutResolver,
}

impl GenerationService {
    /// Build the engine, validating the catalog and layout table.
    ///
    /// Duplicate modules, dependencies on unknown modules, unmapped modules
    /// and static path collisions are rejected here, before any
    /// configuration is seen.
    pub fn new(
        catalog: Box<dyn ModuleCatalog>,
        renderer: Box<dyn ModuleRenderer>,
    ) -> ApismithResult<Self> {
        let layout = LayoutResolver::new(catalog.layout())?;
        DomainValidator::validate_catalog(catalog.modules(), &layout)?;
        debug!(modules = catalog.modules().len(), "module catalog validated");

        Ok(Self {
            catalog,
            renderer,
            layout,
        })
    }

    pub fn layout(&self) -> &LayoutResolver {
        &self.layout
    }

    /// Every catalog module, in registry order.
    pub fn all_modules(&self) -> impl Iterator<Item = &LogicalModule> {
        self.catalog.modules().iter()
    }

    /// Ids of the modules `config` includes.
    pub fn included(&self, config: &ProjectConfig) -> BTreeSet<ModuleId> {
        self.included_modules(config).map(|m| m.id).collect()
    }

    /// Inclusion and placement of every module under `config`.
    pub fn plan(&self, config: &ProjectConfig) -> ApismithResult<Vec<ModulePlan>> {
        self.catalog
            .modules()
            .iter()
            .map(|module| {
                Ok(ModulePlan {
                    id: module.id,
                    description: module.description,
                    included: module.is_included(config),
                    path: self.layout.resolve(module.id, config.structure())?,
                    dependencies: module.active_dependencies(config).collect(),
                })
            })
            .collect()
    }

    /// Generate the complete tree for `config`.
    ///
    /// All-or-nothing: a registry defect or collision aborts with no tree.
    #[instrument(
        skip_all,
        fields(project = %config.project_name(), structure = %config.structure())
    )]
    pub fn generate(&self, config: &ProjectConfig) -> ApismithResult<GeneratedTree> {
        let structure = config.structure();
        let included: Vec<&LogicalModule> = self.included_modules(config).collect();
        let ids: HashSet<ModuleId> = included.iter().map(|m| m.id).collect();

        Self::check_closure(&included, &ids, config)?;

        let mut tree = GeneratedTree::new();
        for module in &included {
            let path = self.layout.resolve(module.id, structure)?;
            let context = self.context_for(module, config, path.clone())?;
            let content = self.renderer.render(module, &context)?;

            tree.insert(
                path,
                GeneratedFile {
                    content,
                    permissions: module.permissions,
                    origin: FileOrigin::Module(module.id),
                },
            )?;
        }

        self.add_package_markers(&mut tree, structure)?;

        debug!(
            modules = included.len(),
            files = tree.len(),
            bytes = tree.total_bytes(),
            "tree generated"
        );
        Ok(tree)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn included_modules<'s>(
        &'s self,
        config: &'s ProjectConfig,
    ) -> impl Iterator<Item = &'s LogicalModule> + 's {
        self.catalog
            .modules()
            .iter()
            .filter(move |m| m.is_included(config))
    }

    /// Every guard-true dependency of an included module must be included.
    fn check_closure(
        included: &[&LogicalModule],
        ids: &HashSet<ModuleId>,
        config: &ProjectConfig,
    ) -> Result<(), DomainError> {
        for module in included {
            if let Some(missing) = module
                .active_dependencies(config)
                .find(|dep| !ids.contains(dep))
            {
                return Err(DomainError::MissingDependency {
                    module: module.id.to_string(),
                    dependency: missing.to_string(),
                });
            }
        }
        Ok(())
    }

    fn context_for<'c>(
        &self,
        module: &LogicalModule,
        config: &'c ProjectConfig,
        path: RelativePath,
    ) -> ApismithResult<RenderContext<'c>> {
        let structure = config.structure();
        let mut context = RenderContext::new(config, module.id, path);

        for dependency in module.active_dependencies(config) {
            let resolved = ResolvedDependency {
                import: self.layout.import_string(module.id, dependency, structure)?,
                module_path: self.layout.module_path(dependency, structure)?,
            };
            context = context.with_dependency(dependency, resolved);
        }
        Ok(context)
    }

    /// Synthesize `__init__.py` for every package directory under a Python
    /// root that holds Python code, plus the structure's skeleton packages.
    fn add_package_markers(
        &self,
        tree: &mut GeneratedTree,
        structure: Structure,
    ) -> ApismithResult<()> {
        let mut packages: BTreeSet<RelativePath> = BTreeSet::new();

        for path in tree.paths().filter(|p| p.is_python()) {
            let mut dir = path.parent();
            while let Some(current) = dir {
                if !is_under_python_root(&current) {
                    break;
                }
                dir = current.parent();
                packages.insert(current);
            }
        }

        for skeleton in self.catalog.skeleton_packages(structure) {
            let mut dir = Some(RelativePath::try_new(skeleton)?);
            while let Some(current) = dir {
                dir = current.parent();
                packages.insert(current);
            }
        }

        for package in packages {
            let marker = package.join(PACKAGE_MARKER)?;
            if tree.contains(marker.as_str()) {
                continue;
            }
            tree.insert(
                marker,
                GeneratedFile {
                    content: String::new(),
                    permissions: Permissions::default(),
                    origin: FileOrigin::PackageMarker,
                },
            )?;
        }
        Ok(())
    }
}

fn is_under_python_root(dir: &RelativePath) -> bool {
    PYTHON_ROOTS.iter().any(|root| dir.starts_with(root))
}
