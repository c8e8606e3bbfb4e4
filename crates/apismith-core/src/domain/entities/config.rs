//! The `ProjectConfig` aggregate root and its typestate builder.
//!
//! A `ProjectConfig` is the fully-resolved, validated set of choices for one
//! generated project. Unset options are inferred at build time and every
//! cross-option rule in `capabilities::CONSTRAINTS` is checked before the
//! value exists, so generation never discovers a contradiction.
//!
//! # Typestate builder
//!
//! `NoName` / `HasName` enforce at compile time that the project name is set
//! before anything else. Runtime validation still runs in `build()`.
//!
//! # Domain purity
//!
//! This module must not import `tracing`.

use std::fmt;
use std::marker::PhantomData;

use serde::Serialize;

use crate::domain::{
    capabilities,
    entities::render_context::{to_kebab_case, to_pascal_case, to_snake_case},
    error::DomainError,
    value_objects::{
        AuthMethod, Broker, CacheBackend, Database, LoggingLibrary, MigrationTool, Orm,
        PythonVersion, Structure, TaskQueue,
    },
};

const MAX_NAME_LEN: usize = 64;

// ── Aggregate root ────────────────────────────────────────────────────────────

/// A fully-validated project configuration. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ProjectConfig {
    project_name: String,
    description: String,
    author_name: String,
    author_email: String,
    python_version: PythonVersion,
    structure: Structure,
    database: Database,
    orm: Orm,
    migration_tool: MigrationTool,
    auth_method: AuthMethod,
    admin_panel: bool,
    cache_backend: CacheBackend,
    task_queue: TaskQueue,
    broker: Broker,
    logging: LoggingLibrary,
    include_examples: bool,
    docker: bool,
    github_actions: bool,
    pre_commit: bool,
}

impl ProjectConfig {
    /// Start building a new `ProjectConfig`.
    pub fn builder() -> ProjectConfigBuilder<NoName> {
        ProjectConfigBuilder::new()
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }
    pub fn description(&self) -> &str {
        &self.description
    }
    pub fn author_name(&self) -> &str {
        &self.author_name
    }
    pub fn author_email(&self) -> &str {
        &self.author_email
    }
    pub const fn python_version(&self) -> PythonVersion {
        self.python_version
    }
    pub const fn structure(&self) -> Structure {
        self.structure
    }
    pub const fn database(&self) -> Database {
        self.database
    }
    pub const fn orm(&self) -> Orm {
        self.orm
    }
    pub const fn migration_tool(&self) -> MigrationTool {
        self.migration_tool
    }
    pub const fn auth_method(&self) -> AuthMethod {
        self.auth_method
    }
    pub const fn admin_panel(&self) -> bool {
        self.admin_panel
    }
    pub const fn cache_backend(&self) -> CacheBackend {
        self.cache_backend
    }
    pub const fn task_queue(&self) -> TaskQueue {
        self.task_queue
    }
    pub const fn broker(&self) -> Broker {
        self.broker
    }
    pub const fn logging(&self) -> LoggingLibrary {
        self.logging
    }
    pub const fn include_examples(&self) -> bool {
        self.include_examples
    }
    pub const fn docker(&self) -> bool {
        self.docker
    }
    pub const fn github_actions(&self) -> bool {
        self.github_actions
    }
    pub const fn pre_commit(&self) -> bool {
        self.pre_commit
    }

    // ── Derived flags ────────────────────────────────────────────────────────

    pub const fn has_database(&self) -> bool {
        !self.database.is_none()
    }

    /// A database reached through an SQLAlchemy-style async session.
    pub const fn has_sql_session(&self) -> bool {
        self.has_database() && self.orm.is_sqlalchemy_family()
    }

    pub const fn has_auth(&self) -> bool {
        !matches!(self.auth_method, AuthMethod::None)
    }

    pub const fn has_cache(&self) -> bool {
        !matches!(self.cache_backend, CacheBackend::None)
    }

    pub const fn has_tasks(&self) -> bool {
        !matches!(self.task_queue, TaskQueue::None)
    }

    /// Example user domain (models, schemas, repository, service, routes).
    pub const fn has_user_examples(&self) -> bool {
        self.include_examples && self.has_database()
    }

    /// Python distribution / import-safe form of the project name.
    pub fn package_name(&self) -> String {
        to_snake_case(&self.project_name)
    }

    pub fn kebab_name(&self) -> String {
        to_kebab_case(&self.project_name)
    }

    pub fn pascal_name(&self) -> String {
        to_pascal_case(&self.project_name)
    }

    /// Compact one-line description of every option, used in sweep reports.
    pub fn label(&self) -> String {
        format!(
            "structure={} db={} orm={} migrations={} auth={} admin={} cache={} tasks={} broker={} logging={} examples={} docker={}",
            self.structure,
            self.database,
            self.orm,
            self.migration_tool,
            self.auth_method,
            self.admin_panel,
            self.cache_backend,
            self.task_queue,
            self.broker,
            self.logging,
            self.include_examples,
            self.docker,
        )
    }

    /// Re-check every invariant. Called by the builder.
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_project_name(&self.project_name)?;
        capabilities::check_constraints(self)
    }
}

impl fmt::Display for ProjectConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {} + {})",
            self.project_name, self.structure, self.database, self.orm
        )
    }
}

/// Names must be usable as a directory, a distribution name and, after
/// snake-casing, a Python identifier.
pub fn validate_project_name(name: &str) -> Result<(), DomainError> {
    let reject = |reason: &str| {
        Err(DomainError::InvalidProjectName {
            name: name.into(),
            reason: reason.into(),
        })
    };

    let Some(first) = name.chars().next() else {
        return reject("name cannot be empty");
    };
    if !first.is_ascii_alphabetic() {
        return reject("name must start with a letter");
    }
    if name.len() > MAX_NAME_LEN {
        return reject("name is longer than 64 characters");
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return reject(&format!("character '{bad}' is not allowed"));
    }
    Ok(())
}

// ── Typestate markers ─────────────────────────────────────────────────────────

/// Marker: project name has not yet been set.
pub struct NoName;
/// Marker: project name has been set; options may now be configured.
pub struct HasName;

// ── Builder ───────────────────────────────────────────────────────────────────

/// Typestate builder for [`ProjectConfig`].
///
/// `orm`, `migration_tool` and `broker` stay `None` until `build()` so that
/// an explicit choice can be told apart from an inferred one.
pub struct ProjectConfigBuilder<N> {
    project_name: String,
    description: Option<String>,
    author_name: Option<String>,
    author_email: Option<String>,
    python_version: PythonVersion,
    structure: Structure,
    database: Database,
    orm: Option<Orm>,
    migration_tool: Option<MigrationTool>,
    auth_method: AuthMethod,
    admin_panel: bool,
    cache_backend: CacheBackend,
    task_queue: TaskQueue,
    broker: Option<Broker>,
    logging: LoggingLibrary,
    include_examples: bool,
    docker: bool,
    github_actions: bool,
    pre_commit: bool,
    _marker: PhantomData<N>,
}

impl ProjectConfigBuilder<NoName> {
    pub fn new() -> Self {
        Self {
            project_name: String::new(),
            description: None,
            author_name: None,
            author_email: None,
            python_version: PythonVersion::default(),
            structure: Structure::Layered,
            database: Database::Postgres,
            orm: None,
            migration_tool: None,
            auth_method: AuthMethod::None,
            admin_panel: false,
            cache_backend: CacheBackend::None,
            task_queue: TaskQueue::None,
            broker: None,
            logging: LoggingLibrary::Standard,
            include_examples: true,
            docker: false,
            github_actions: false,
            pre_commit: false,
            _marker: PhantomData,
        }
    }

    /// Set the project name. This transitions the builder to `HasName`.
    pub fn name(self, name: impl Into<String>) -> ProjectConfigBuilder<HasName> {
        ProjectConfigBuilder {
            project_name: name.into(),
            description: self.description,
            author_name: self.author_name,
            author_email: self.author_email,
            python_version: self.python_version,
            structure: self.structure,
            database: self.database,
            orm: self.orm,
            migration_tool: self.migration_tool,
            auth_method: self.auth_method,
            admin_panel: self.admin_panel,
            cache_backend: self.cache_backend,
            task_queue: self.task_queue,
            broker: self.broker,
            logging: self.logging,
            include_examples: self.include_examples,
            docker: self.docker,
            github_actions: self.github_actions,
            pre_commit: self.pre_commit,
            _marker: PhantomData,
        }
    }
}

impl Default for ProjectConfigBuilder<NoName> {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectConfigBuilder<HasName> {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn author(mut self, name: impl Into<String>, email: impl Into<String>) -> Self {
        self.author_name = Some(name.into());
        self.author_email = Some(email.into());
        self
    }

    pub fn author_name(mut self, name: impl Into<String>) -> Self {
        self.author_name = Some(name.into());
        self
    }

    pub fn author_email(mut self, email: impl Into<String>) -> Self {
        self.author_email = Some(email.into());
        self
    }

    pub fn python_version(mut self, version: PythonVersion) -> Self {
        self.python_version = version;
        self
    }

    pub fn structure(mut self, structure: Structure) -> Self {
        self.structure = structure;
        self
    }

    pub fn database(mut self, database: Database) -> Self {
        self.database = database;
        self
    }

    pub fn orm(mut self, orm: Orm) -> Self {
        self.orm = Some(orm);
        self
    }

    pub fn migration_tool(mut self, tool: MigrationTool) -> Self {
        self.migration_tool = Some(tool);
        self
    }

    pub fn auth_method(mut self, method: AuthMethod) -> Self {
        self.auth_method = method;
        self
    }

    pub fn admin_panel(mut self, enabled: bool) -> Self {
        self.admin_panel = enabled;
        self
    }

    pub fn cache_backend(mut self, backend: CacheBackend) -> Self {
        self.cache_backend = backend;
        self
    }

    pub fn task_queue(mut self, queue: TaskQueue) -> Self {
        self.task_queue = queue;
        self
    }

    pub fn broker(mut self, broker: Broker) -> Self {
        self.broker = Some(broker);
        self
    }

    pub fn logging(mut self, logging: LoggingLibrary) -> Self {
        self.logging = logging;
        self
    }

    pub fn include_examples(mut self, enabled: bool) -> Self {
        self.include_examples = enabled;
        self
    }

    pub fn docker(mut self, enabled: bool) -> Self {
        self.docker = enabled;
        self
    }

    pub fn github_actions(mut self, enabled: bool) -> Self {
        self.github_actions = enabled;
        self
    }

    pub fn pre_commit(mut self, enabled: bool) -> Self {
        self.pre_commit = enabled;
        self
    }

    /// Build and validate the configuration, inferring any unset options.
    ///
    /// Inference order:
    /// 1. `orm` from the database
    /// 2. `migration_tool` from the ORM
    /// 3. `broker` from the task queue
    pub fn build(self) -> Result<ProjectConfig, DomainError> {
        validate_project_name(&self.project_name)?;

        let orm = self
            .orm
            .unwrap_or_else(|| capabilities::infer_orm(self.database));
        let migration_tool = self
            .migration_tool
            .unwrap_or_else(|| capabilities::infer_migration_tool(orm));
        let broker = self
            .broker
            .unwrap_or_else(|| capabilities::infer_broker(self.task_queue));

        let description = self
            .description
            .unwrap_or_else(|| format!("{} API", to_pascal_case(&self.project_name)));

        let config = ProjectConfig {
            project_name: self.project_name,
            description,
            author_name: self.author_name.unwrap_or_else(|| "Your Name".into()),
            author_email: self
                .author_email
                .unwrap_or_else(|| "you@example.com".into()),
            python_version: self.python_version,
            structure: self.structure,
            database: self.database,
            orm,
            migration_tool,
            auth_method: self.auth_method,
            admin_panel: self.admin_panel,
            cache_backend: self.cache_backend,
            task_queue: self.task_queue,
            broker,
            logging: self.logging,
            include_examples: self.include_examples,
            docker: self.docker,
            github_actions: self.github_actions,
            pre_commit: self.pre_commit,
        };

        config.validate()?;
        Ok(config)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn named() -> ProjectConfigBuilder<HasName> {
        ProjectConfig::builder().name("shop-api")
    }

    #[test]
    fn defaults_are_inferred() {
        let config = named().build().unwrap();
        assert_eq!(config.structure(), Structure::Layered);
        assert_eq!(config.database(), Database::Postgres);
        assert_eq!(config.orm(), Orm::SqlAlchemy);
        assert_eq!(config.migration_tool(), MigrationTool::Alembic);
        assert_eq!(config.broker(), Broker::None);
        assert_eq!(config.python_version(), PythonVersion::Py312);
        assert!(config.include_examples());
    }

    #[test]
    fn no_database_infers_no_orm_and_no_migrations() {
        let config = named().database(Database::None).build().unwrap();
        assert_eq!(config.orm(), Orm::None);
        assert_eq!(config.migration_tool(), MigrationTool::None);
        assert!(!config.has_user_examples());
    }

    #[test]
    fn tortoise_infers_aerich() {
        let config = named().orm(Orm::Tortoise).build().unwrap();
        assert_eq!(config.migration_tool(), MigrationTool::Aerich);
        assert!(!config.has_sql_session());
    }

    #[test]
    fn admin_with_tortoise_is_rejected() {
        let err = named()
            .orm(Orm::Tortoise)
            .admin_panel(true)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::IncompatibleOptions {
                field: "admin_panel",
                ..
            }
        ));
    }

    #[test]
    fn orm_without_database_is_rejected() {
        let err = named()
            .database(Database::None)
            .orm(Orm::SqlAlchemy)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::IncompatibleOptions { field: "orm", .. }
        ));
    }

    #[test]
    fn database_with_explicit_no_orm_is_rejected() {
        assert!(named().orm(Orm::None).build().is_err());
    }

    #[test]
    fn alembic_with_tortoise_is_rejected() {
        let err = named()
            .orm(Orm::Tortoise)
            .migration_tool(MigrationTool::Alembic)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("migration_tool"));
    }

    #[test]
    fn arq_requires_redis() {
        assert!(named().task_queue(TaskQueue::Arq).build().is_ok());
        assert!(
            named()
                .task_queue(TaskQueue::Arq)
                .broker(Broker::RabbitMq)
                .build()
                .is_err()
        );
    }

    #[test]
    fn broker_without_queue_is_rejected() {
        assert!(named().broker(Broker::Redis).build().is_err());
    }

    #[test]
    fn invalid_names_are_rejected() {
        for name in ["", "1app", "my app", "api/v1", ".hidden"] {
            let result = ProjectConfig::builder().name(name).build();
            assert!(
                matches!(result, Err(DomainError::InvalidProjectName { .. })),
                "accepted {name:?}"
            );
        }
    }

    #[test]
    fn name_forms_are_derived() {
        let config = ProjectConfig::builder().name("Shop-Api").build().unwrap();
        assert_eq!(config.package_name(), "shop_api");
        assert_eq!(config.kebab_name(), "shop-api");
        assert_eq!(config.pascal_name(), "ShopApi");
        assert_eq!(config.description(), "ShopApi API");
    }

    #[test]
    fn label_mentions_every_axis() {
        let label = named().build().unwrap().label();
        for key in ["structure=", "db=", "orm=", "auth=", "cache=", "examples="] {
            assert!(label.contains(key), "{label}");
        }
    }
}
