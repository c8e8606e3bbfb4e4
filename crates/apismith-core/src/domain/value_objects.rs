//! Domain value objects: every enumerated choice a generated project can make.
//!
//! # Design
//!
//! These are pure value types (`Copy`, equality-by-value, no identity).
//! They hold NO compatibility logic. All rules live in `capabilities.rs`.
//! This file only defines the types, their string forms and their parsers.
//!
//! # Adding New Variants
//!
//! 1. Add the enum variant and its `ALL` entry here
//! 2. Add the `as_str` arm and the `FromStr` arm here
//! 3. Add a definition row in `capabilities.rs`
//! 4. Teach the affected module templates about it

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Structure ────────────────────────────────────────────────────────────────

/// Directory layout of the generated application package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Structure {
    /// `app/api`, `app/models`, `app/services`, ... grouped by technical layer.
    Layered,
    /// `app/domains/<domain>/...` grouped by business domain.
    DomainDriven,
    /// Everything one level below `app/`.
    Flat,
}

impl Structure {
    pub const ALL: &'static [Self] = &[Self::Layered, Self::DomainDriven, Self::Flat];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Layered => "layered",
            Self::DomainDriven => "domain-driven",
            Self::Flat => "flat",
        }
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Structure {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "layered" | "layer" => Ok(Self::Layered),
            "domain-driven" | "domain_driven" | "domaindriven" | "ddd" | "domain" => {
                Ok(Self::DomainDriven)
            }
            "flat" | "simple" => Ok(Self::Flat),
            other => Err(DomainError::InvalidOption {
                field: "structure",
                value: other.into(),
            }),
        }
    }
}

// ── Database ─────────────────────────────────────────────────────────────────

/// Relational database backing the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Postgres,
    MySql,
    Sqlite,
    None,
}

impl Database {
    pub const ALL: &'static [Self] = &[Self::Postgres, Self::MySql, Self::Sqlite, Self::None];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::MySql => "mysql",
            Self::Sqlite => "sqlite",
            Self::None => "none",
        }
    }

    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Database {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            "mysql" | "mariadb" => Ok(Self::MySql),
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            "none" | "no" => Ok(Self::None),
            other => Err(DomainError::InvalidOption {
                field: "database",
                value: other.into(),
            }),
        }
    }
}

// ── Orm ──────────────────────────────────────────────────────────────────────

/// Object-relational mapper used by the models layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orm {
    SqlAlchemy,
    SqlModel,
    Tortoise,
    None,
}

impl Orm {
    pub const ALL: &'static [Self] = &[Self::SqlAlchemy, Self::SqlModel, Self::Tortoise, Self::None];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SqlAlchemy => "sqlalchemy",
            Self::SqlModel => "sqlmodel",
            Self::Tortoise => "tortoise",
            Self::None => "none",
        }
    }

    /// SQLAlchemy and SQLModel share the async session machinery.
    pub const fn is_sqlalchemy_family(self) -> bool {
        matches!(self, Self::SqlAlchemy | Self::SqlModel)
    }
}

impl fmt::Display for Orm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Orm {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sqlalchemy" | "sqla" => Ok(Self::SqlAlchemy),
            "sqlmodel" => Ok(Self::SqlModel),
            "tortoise" | "tortoise-orm" => Ok(Self::Tortoise),
            "none" | "no" => Ok(Self::None),
            other => Err(DomainError::InvalidOption {
                field: "orm",
                value: other.into(),
            }),
        }
    }
}

// ── MigrationTool ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MigrationTool {
    Alembic,
    Aerich,
    None,
}

impl MigrationTool {
    pub const ALL: &'static [Self] = &[Self::Alembic, Self::Aerich, Self::None];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Alembic => "alembic",
            Self::Aerich => "aerich",
            Self::None => "none",
        }
    }
}

impl fmt::Display for MigrationTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MigrationTool {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "alembic" => Ok(Self::Alembic),
            "aerich" => Ok(Self::Aerich),
            "none" | "no" => Ok(Self::None),
            other => Err(DomainError::InvalidOption {
                field: "migration_tool",
                value: other.into(),
            }),
        }
    }
}

// ── AuthMethod ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMethod {
    Jwt,
    OAuth2,
    Session,
    None,
}

impl AuthMethod {
    pub const ALL: &'static [Self] = &[Self::Jwt, Self::OAuth2, Self::Session, Self::None];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Jwt => "jwt",
            Self::OAuth2 => "oauth2",
            Self::Session => "session",
            Self::None => "none",
        }
    }
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jwt" => Ok(Self::Jwt),
            "oauth2" | "oauth" => Ok(Self::OAuth2),
            "session" | "cookie" => Ok(Self::Session),
            "none" | "no" => Ok(Self::None),
            other => Err(DomainError::InvalidOption {
                field: "auth_method",
                value: other.into(),
            }),
        }
    }
}

// ── CacheBackend ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheBackend {
    Redis,
    Memcached,
    InMemory,
    None,
}

impl CacheBackend {
    pub const ALL: &'static [Self] = &[Self::Redis, Self::Memcached, Self::InMemory, Self::None];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Redis => "redis",
            Self::Memcached => "memcached",
            Self::InMemory => "in-memory",
            Self::None => "none",
        }
    }
}

impl fmt::Display for CacheBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheBackend {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memcached" | "memcache" => Ok(Self::Memcached),
            "in-memory" | "inmemory" | "in_memory" | "memory" => Ok(Self::InMemory),
            "none" | "no" => Ok(Self::None),
            other => Err(DomainError::InvalidOption {
                field: "cache_backend",
                value: other.into(),
            }),
        }
    }
}

// ── TaskQueue / Broker ───────────────────────────────────────────────────────

/// Background job runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskQueue {
    Celery,
    Arq,
    Dramatiq,
    None,
}

impl TaskQueue {
    pub const ALL: &'static [Self] = &[Self::Celery, Self::Arq, Self::Dramatiq, Self::None];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Celery => "celery",
            Self::Arq => "arq",
            Self::Dramatiq => "dramatiq",
            Self::None => "none",
        }
    }
}

impl fmt::Display for TaskQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskQueue {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "celery" => Ok(Self::Celery),
            "arq" => Ok(Self::Arq),
            "dramatiq" => Ok(Self::Dramatiq),
            "none" | "no" => Ok(Self::None),
            other => Err(DomainError::InvalidOption {
                field: "task_queue",
                value: other.into(),
            }),
        }
    }
}

/// Message broker carrying task-queue jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Broker {
    Redis,
    RabbitMq,
    None,
}

impl Broker {
    pub const ALL: &'static [Self] = &[Self::Redis, Self::RabbitMq, Self::None];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Redis => "redis",
            Self::RabbitMq => "rabbitmq",
            Self::None => "none",
        }
    }
}

impl fmt::Display for Broker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Broker {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "rabbitmq" | "rabbit" | "amqp" => Ok(Self::RabbitMq),
            "none" | "no" => Ok(Self::None),
            other => Err(DomainError::InvalidOption {
                field: "broker",
                value: other.into(),
            }),
        }
    }
}

// ── LoggingLibrary ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggingLibrary {
    Loguru,
    Structlog,
    Standard,
}

impl LoggingLibrary {
    pub const ALL: &'static [Self] = &[Self::Loguru, Self::Structlog, Self::Standard];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Loguru => "loguru",
            Self::Structlog => "structlog",
            Self::Standard => "standard",
        }
    }
}

impl fmt::Display for LoggingLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoggingLibrary {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "loguru" => Ok(Self::Loguru),
            "structlog" => Ok(Self::Structlog),
            "standard" | "stdlib" | "logging" => Ok(Self::Standard),
            other => Err(DomainError::InvalidOption {
                field: "logging",
                value: other.into(),
            }),
        }
    }
}

// ── PythonVersion ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PythonVersion {
    #[serde(rename = "3.10")]
    Py310,
    #[serde(rename = "3.11")]
    Py311,
    #[serde(rename = "3.12")]
    Py312,
    #[serde(rename = "3.13")]
    Py313,
}

impl PythonVersion {
    pub const ALL: &'static [Self] = &[Self::Py310, Self::Py311, Self::Py312, Self::Py313];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Py310 => "3.10",
            Self::Py311 => "3.11",
            Self::Py312 => "3.12",
            Self::Py313 => "3.13",
        }
    }

    /// Ruff / black target tag, e.g. `py312`.
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Py310 => "py310",
            Self::Py311 => "py311",
            Self::Py312 => "py312",
            Self::Py313 => "py313",
        }
    }
}

impl Default for PythonVersion {
    fn default() -> Self {
        Self::Py312
    }
}

impl fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PythonVersion {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().trim_start_matches("py") {
            "3.10" | "310" => Ok(Self::Py310),
            "3.11" | "311" => Ok(Self::Py311),
            "3.12" | "312" => Ok(Self::Py312),
            "3.13" | "313" => Ok(Self::Py313),
            _ => Err(DomainError::InvalidOption {
                field: "python_version",
                value: s.into(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structure_parses_aliases() {
        assert_eq!("ddd".parse::<Structure>().unwrap(), Structure::DomainDriven);
        assert_eq!("Layered".parse::<Structure>().unwrap(), Structure::Layered);
        assert!("hexagonal".parse::<Structure>().is_err());
    }

    #[test]
    fn as_str_round_trips_through_from_str() {
        for s in Structure::ALL {
            assert_eq!(s.as_str().parse::<Structure>().unwrap(), *s);
        }
        for c in CacheBackend::ALL {
            assert_eq!(c.as_str().parse::<CacheBackend>().unwrap(), *c);
        }
        for v in PythonVersion::ALL {
            assert_eq!(v.as_str().parse::<PythonVersion>().unwrap(), *v);
        }
    }

    #[test]
    fn unknown_database_names_field() {
        let err = "oracle".parse::<Database>().unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidOption {
                field: "database",
                ..
            }
        ));
    }

    #[test]
    fn python_version_accepts_tags() {
        assert_eq!("py311".parse::<PythonVersion>().unwrap(), PythonVersion::Py311);
        assert_eq!(PythonVersion::default().tag(), "py312");
    }

    #[test]
    fn sqlalchemy_family() {
        assert!(Orm::SqlModel.is_sqlalchemy_family());
        assert!(!Orm::Tortoise.is_sqlalchemy_family());
    }
}
