//! Logical modules: the abstract units a generated project is composed of.
//!
//! A module knows *whether* it exists for a configuration (its inclusion
//! predicate), *what* it needs (guarded dependencies) and *how* to produce
//! its text (a template function). It does not know where it lives; that is
//! the layout's job.

use std::fmt;

use serde::Serialize;

use crate::domain::{
    entities::{common::Permissions, config::ProjectConfig, render_context::RenderContext},
    error::DomainError,
};

/// Stable dotted identifier such as `core.security` or `models.user`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ModuleId(&'static str);

impl ModuleId {
    pub const fn new(id: &'static str) -> Self {
        Self(id)
    }

    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Boolean rule over configuration fields.
pub type Predicate = fn(&ProjectConfig) -> bool;

/// Produces the module's text from its render context.
pub type TemplateFn = fn(&RenderContext<'_>) -> Result<String, DomainError>;

/// Predicate that always holds.
pub fn always(_: &ProjectConfig) -> bool {
    true
}

/// A dependency on another module, optionally guarded by its own predicate.
#[derive(Debug, Clone, Copy)]
pub struct Dependency {
    pub target: ModuleId,
    pub guard: Option<Predicate>,
}

impl Dependency {
    pub const fn always(target: ModuleId) -> Self {
        Self {
            target,
            guard: None,
        }
    }

    pub const fn when(target: ModuleId, guard: Predicate) -> Self {
        Self {
            target,
            guard: Some(guard),
        }
    }

    pub fn is_active(&self, config: &ProjectConfig) -> bool {
        self.guard.is_none_or(|guard| guard(config))
    }
}

/// One entry of the module registry.
#[derive(Debug, Clone, Copy)]
pub struct LogicalModule {
    pub id: ModuleId,
    pub description: &'static str,
    pub include: Predicate,
    pub dependencies: &'static [Dependency],
    pub template: TemplateFn,
    pub permissions: Permissions,
}

impl LogicalModule {
    pub fn is_included(&self, config: &ProjectConfig) -> bool {
        (self.include)(config)
    }

    /// Dependencies whose guard holds for `config`.
    pub fn active_dependencies<'c>(
        &self,
        config: &'c ProjectConfig,
    ) -> impl Iterator<Item = ModuleId> + 'c {
        self.dependencies
            .iter()
            .filter(move |d| d.is_active(config))
            .map(|d| d.target)
    }
}
