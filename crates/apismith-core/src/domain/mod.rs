// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for apismith.
//!
//! Pure composition logic: the configuration model, the capability rules
//! that validate it, the logical module vocabulary, the layout resolver and
//! the generated tree. Templates, filesystem access and the concrete module
//! catalog are supplied through ports defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No I/O**: no filesystem, network or process access
//! - **No logging**: `tracing` belongs to the application layer
//! - **Immutable values**: configurations and trees never change once built
//! - **Static tables**: registries are `'static` data shared across threads
//!
// Public API - what the world sees
pub mod capabilities;
pub mod entities;
pub mod error;
pub mod layout;
pub mod value_objects;

// Private implementation details - not visible outside domain
mod validation;

// Re-exports for convenience
pub use entities::{
    common::{Permissions, RelativePath},
    config::{HasName, NoName, ProjectConfig, ProjectConfigBuilder, validate_project_name},
    consistency::{ConsistencyReport, Finding, FindingReason, ImportReference, ReferenceKind},
    generated_tree::{FileOrigin, GeneratedFile, GeneratedTree},
    module::{Dependency, LogicalModule, ModuleId, Predicate, TemplateFn, always},
    render_context::{RenderContext, ResolvedDependency},
};

pub use error::{DomainError, ErrorCategory};

pub use layout::{LayoutEntry, LayoutResolver, PYTHON_ROOTS, Placement, dotted_module_path};

pub use value_objects::{
    AuthMethod, Broker, CacheBackend, Database, LoggingLibrary, MigrationTool, Orm, PythonVersion,
    Structure, TaskQueue,
};

pub use validation::DomainValidator;

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    // ========================================================================
    // Value Object Tests
    // ========================================================================

    #[test]
    fn structure_parses_aliases() {
        assert_eq!(Structure::from_str("ddd").unwrap(), Structure::DomainDriven);
        assert_eq!(Structure::from_str("Flat").unwrap(), Structure::Flat);
        assert!(Structure::from_str("hexagonal").is_err());
    }

    #[test]
    fn orm_families() {
        assert!(Orm::SqlModel.is_sqlalchemy_family());
        assert!(!Orm::Tortoise.is_sqlalchemy_family());
    }

    // ========================================================================
    // Configuration Builder Tests (Typestate)
    // ========================================================================

    #[test]
    fn builder_full() {
        let config = ProjectConfig::builder()
            .name("orders")
            .structure(Structure::DomainDriven)
            .database(Database::Sqlite)
            .orm(Orm::SqlModel)
            .auth_method(AuthMethod::OAuth2)
            .admin_panel(true)
            .cache_backend(CacheBackend::Redis)
            .task_queue(TaskQueue::Celery)
            .broker(Broker::RabbitMq)
            .logging(LoggingLibrary::Structlog)
            .docker(true)
            .build()
            .unwrap();

        assert_eq!(config.migration_tool(), MigrationTool::Alembic);
        assert!(config.has_sql_session());
        assert!(config.has_tasks());
        assert!(config.has_cache());
        assert_eq!(config.broker(), Broker::RabbitMq);
    }

    #[test]
    fn scenario_tortoise_admin_fails_before_generation() {
        let err = ProjectConfig::builder()
            .name("orders")
            .orm(Orm::Tortoise)
            .admin_panel(true)
            .build()
            .unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Compatibility);
        assert!(!err.is_registry_defect());
    }

    // ========================================================================
    // Layout Tests
    // ========================================================================

    #[test]
    fn placement_selects_structure_column() {
        let placement = Placement::PerStructure {
            layered: "app/core/security.py",
            domain_driven: "app/core/security.py",
            flat: "app/security.py",
        };
        assert_eq!(placement.path_for(Structure::Flat), "app/security.py");
        assert_eq!(
            Placement::Shared("README.md").path_for(Structure::DomainDriven),
            "README.md"
        );
    }

    #[test]
    fn python_roots_are_app_and_tests() {
        assert_eq!(PYTHON_ROOTS, &["app", "tests"]);
    }

    // ========================================================================
    // Capability Tests
    // ========================================================================

    #[test]
    fn driver_follows_database_and_orm() {
        assert_eq!(
            capabilities::database_driver(Database::Postgres, Orm::SqlAlchemy),
            Some("psycopg[binary]>=3.2")
        );
        assert_eq!(capabilities::database_driver(Database::None, Orm::None), None);
    }
}
