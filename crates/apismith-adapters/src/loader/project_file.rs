//! Project configuration files (`.toml` or `.json`).
//!
//! ```toml
//! project_name     = "shop-api"
//! structure        = "domain-driven"   # layered | domain-driven | flat
//! database         = "postgres"
//! auth_method      = "jwt"
//! cache_backend    = "redis"
//! task_queue       = "celery"
//! include_examples = true
//! ```
//!
//! Every key except `project_name` is optional; unset options are inferred
//! by the configuration builder.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use apismith_core::{
    application::ApplicationError,
    domain::{
        AuthMethod, Broker, CacheBackend, Database, LoggingLibrary, MigrationTool, Orm,
        ProjectConfig, PythonVersion, Structure, TaskQueue,
    },
    error::ApismithResult,
};

use super::load_failed;

/// Partial project configuration as written in a file or collected from
/// command-line flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectFile {
    #[serde(alias = "name", skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub python_version: Option<PythonVersion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structure: Option<Structure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<Database>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orm: Option<Orm>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub migration_tool: Option<MigrationTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_method: Option<AuthMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_panel: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_backend: Option<CacheBackend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_queue: Option<TaskQueue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub broker: Option<Broker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingLibrary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_examples: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docker: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_actions: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_commit: Option<bool>,
}

impl ProjectFile {
    /// Overlay `other` on `self`: every option set in `other` wins.
    pub fn merge(self, other: ProjectFile) -> ProjectFile {
        ProjectFile {
            project_name: other.project_name.or(self.project_name),
            description: other.description.or(self.description),
            author_name: other.author_name.or(self.author_name),
            author_email: other.author_email.or(self.author_email),
            python_version: other.python_version.or(self.python_version),
            structure: other.structure.or(self.structure),
            database: other.database.or(self.database),
            orm: other.orm.or(self.orm),
            migration_tool: other.migration_tool.or(self.migration_tool),
            auth_method: other.auth_method.or(self.auth_method),
            admin_panel: other.admin_panel.or(self.admin_panel),
            cache_backend: other.cache_backend.or(self.cache_backend),
            task_queue: other.task_queue.or(self.task_queue),
            broker: other.broker.or(self.broker),
            logging: other.logging.or(self.logging),
            include_examples: other.include_examples.or(self.include_examples),
            docker: other.docker.or(self.docker),
            github_actions: other.github_actions.or(self.github_actions),
            pre_commit: other.pre_commit.or(self.pre_commit),
        }
    }

    /// Build and validate the configuration.
    pub fn into_config(self) -> ApismithResult<ProjectConfig> {
        let name = self
            .project_name
            .ok_or_else(|| ApplicationError::ValidationFailed("project name is required".into()))?;

        let mut builder = ProjectConfig::builder().name(name);
        if let Some(description) = self.description {
            builder = builder.description(description);
        }
        if let Some(author) = self.author_name {
            builder = builder.author_name(author);
        }
        if let Some(email) = self.author_email {
            builder = builder.author_email(email);
        }
        if let Some(version) = self.python_version {
            builder = builder.python_version(version);
        }
        if let Some(structure) = self.structure {
            builder = builder.structure(structure);
        }
        if let Some(database) = self.database {
            builder = builder.database(database);
        }
        if let Some(orm) = self.orm {
            builder = builder.orm(orm);
        }
        if let Some(tool) = self.migration_tool {
            builder = builder.migration_tool(tool);
        }
        if let Some(method) = self.auth_method {
            builder = builder.auth_method(method);
        }
        if let Some(enabled) = self.admin_panel {
            builder = builder.admin_panel(enabled);
        }
        if let Some(backend) = self.cache_backend {
            builder = builder.cache_backend(backend);
        }
        if let Some(queue) = self.task_queue {
            builder = builder.task_queue(queue);
        }
        if let Some(broker) = self.broker {
            builder = builder.broker(broker);
        }
        if let Some(logging) = self.logging {
            builder = builder.logging(logging);
        }
        if let Some(enabled) = self.include_examples {
            builder = builder.include_examples(enabled);
        }
        if let Some(enabled) = self.docker {
            builder = builder.docker(enabled);
        }
        if let Some(enabled) = self.github_actions {
            builder = builder.github_actions(enabled);
        }
        if let Some(enabled) = self.pre_commit {
            builder = builder.pre_commit(enabled);
        }

        Ok(builder.build()?)
    }
}

/// Parse a project file, choosing the format by extension.
#[instrument(fields(path = %path.display()))]
pub fn load_project_file(path: &Path) -> ApismithResult<ProjectFile> {
    let raw = fs::read_to_string(path).map_err(|e| load_failed(path, e.to_string()))?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let file = match extension.as_deref() {
        Some("toml") => toml::from_str(&raw).map_err(|e| load_failed(path, e.to_string()))?,
        Some("json") => {
            serde_json::from_str(&raw).map_err(|e| load_failed(path, e.to_string()))?
        }
        other => {
            return Err(load_failed(
                path,
                format!("unsupported file extension {:?}", other.unwrap_or("")),
            ));
        }
    };

    debug!("project file loaded");
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use apismith_core::error::ApismithError;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn loads_toml_and_infers_the_rest() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "project.toml",
            r#"
project_name = "shop-api"
structure = "domain-driven"
orm = "tortoise"
auth_method = "jwt"
task_queue = "dramatiq"
python_version = "3.11"
"#,
        );

        let config = load_project_file(&path).unwrap().into_config().unwrap();

        assert_eq!(config.project_name(), "shop-api");
        assert_eq!(config.structure(), Structure::DomainDriven);
        assert_eq!(config.migration_tool(), MigrationTool::Aerich);
        assert_eq!(config.broker(), Broker::Redis);
        assert_eq!(config.python_version(), PythonVersion::Py311);
    }

    #[test]
    fn loads_json() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "project.json",
            r#"{"name": "svc", "database": "sqlite", "cache_backend": "in-memory"}"#,
        );

        let config = load_project_file(&path).unwrap().into_config().unwrap();
        assert_eq!(config.database(), Database::Sqlite);
        assert_eq!(config.cache_backend(), CacheBackend::InMemory);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "project.toml", "project_name = \"svc\"\nframework = \"flask\"\n");

        let err = load_project_file(&path).unwrap_err();
        assert!(matches!(
            err,
            ApismithError::Application(ApplicationError::LoadFailed { .. })
        ));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "project.yaml", "project_name: svc\n");
        assert!(load_project_file(&path).is_err());
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let err = load_project_file(Path::new("/no/such/project.toml")).unwrap_err();
        assert!(err.to_string().contains("project.toml"));
    }

    #[test]
    fn merge_prefers_the_overlay() {
        let base = ProjectFile {
            project_name: Some("from-file".into()),
            docker: Some(true),
            auth_method: Some(AuthMethod::Jwt),
            ..Default::default()
        };
        let flags = ProjectFile {
            project_name: Some("from-flags".into()),
            auth_method: Some(AuthMethod::Session),
            ..Default::default()
        };

        let merged = base.merge(flags);
        assert_eq!(merged.project_name.as_deref(), Some("from-flags"));
        assert_eq!(merged.auth_method, Some(AuthMethod::Session));
        assert_eq!(merged.docker, Some(true));
    }

    #[test]
    fn incompatible_file_fails_validation() {
        let file = ProjectFile {
            project_name: Some("svc".into()),
            orm: Some(Orm::Tortoise),
            admin_panel: Some(true),
            ..Default::default()
        };
        assert!(matches!(file.into_config(), Err(ApismithError::Domain(_))));
    }

    #[test]
    fn name_is_required() {
        assert!(ProjectFile::default().into_config().is_err());
    }
}
