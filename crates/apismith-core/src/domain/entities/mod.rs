pub mod common;
pub mod config;
pub mod consistency;
pub mod generated_tree;
pub mod module;
pub mod render_context;

pub use crate::domain::DomainError;
pub use config::{HasName, NoName, ProjectConfig, ProjectConfigBuilder};
pub use consistency::{ConsistencyReport, Finding, FindingReason, ImportReference};
pub use generated_tree::{FileOrigin, GeneratedFile, GeneratedTree};
pub use module::{Dependency, LogicalModule, ModuleId, Predicate, TemplateFn};
pub use render_context::{RenderContext, ResolvedDependency};
