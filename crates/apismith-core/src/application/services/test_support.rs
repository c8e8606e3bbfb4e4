//! In-crate catalog and renderer doubles for service tests.

use crate::{
    application::ports::{ModuleCatalog, ModuleRenderer},
    domain::{LayoutEntry, LogicalModule, RenderContext, Structure},
    error::ApismithResult,
};

pub(crate) struct TestCatalog {
    pub modules: Vec<LogicalModule>,
    pub layout: Vec<LayoutEntry>,
    /// Skeleton packages for the layered structure only.
    pub skeleton: Vec<&'static str>,
}

impl ModuleCatalog for TestCatalog {
    fn modules(&self) -> &[LogicalModule] {
        &self.modules
    }

    fn layout(&self) -> &[LayoutEntry] {
        &self.layout
    }

    fn skeleton_packages(&self, structure: Structure) -> &[&'static str] {
        match structure {
            Structure::Layered => &self.skeleton,
            _ => &[],
        }
    }
}

/// Calls the module's own template function.
pub(crate) struct CallTemplate;

impl ModuleRenderer for CallTemplate {
    fn render(&self, module: &LogicalModule, context: &RenderContext<'_>) -> ApismithResult<String> {
        Ok((module.template)(context)?)
    }
}
