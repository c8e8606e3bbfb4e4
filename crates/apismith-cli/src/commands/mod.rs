//! Command handlers. Each translates parsed arguments into core calls and
//! renders the result; no composition rules live here.

pub mod completions;
pub mod config;
pub mod init;
pub mod modules;
pub mod new;
pub mod sweep;
pub mod verify;

use apismith_adapters::{ProjectFile, load_project_file};
use apismith_core::domain::ProjectConfig;

use crate::{cli::ProjectArgs, config::AppConfig, error::CliResult};

/// Name used when a command generates a tree without a user-supplied name.
pub const PREVIEW_NAME: &str = "preview-api";

/// Flags as the highest-priority project file layer. Boolean switches only
/// ever turn their option on (or examples off), so an absent switch leaves
/// lower layers untouched.
fn flags_layer(args: &ProjectArgs) -> ProjectFile {
    ProjectFile {
        project_name: None,
        description: args.description.clone(),
        author_name: args.author_name.clone(),
        author_email: args.author_email.clone(),
        python_version: args.python_version,
        structure: args.structure,
        database: args.database,
        orm: args.orm,
        migration_tool: args.migration_tool,
        auth_method: args.auth_method,
        admin_panel: args.admin_panel.then_some(true),
        cache_backend: args.cache_backend,
        task_queue: args.task_queue,
        broker: args.broker,
        logging: args.logging,
        include_examples: args.no_examples.then_some(false),
        docker: args.docker.then_some(true),
        github_actions: args.github_actions.then_some(true),
        pre_commit: args.pre_commit.then_some(true),
    }
}

/// Merge configured defaults, the `--from` file and flags into a validated
/// project configuration.
///
/// `name` wins over a name in the file; without either the preview name is
/// used.
pub fn resolve_project(
    name: Option<&str>,
    args: &ProjectArgs,
    config: &AppConfig,
) -> CliResult<ProjectConfig> {
    let mut layered = config.defaults.as_project_file();
    if let Some(path) = &args.from {
        layered = layered.merge(load_project_file(path)?);
    }
    layered = layered.merge(flags_layer(args));

    if let Some(name) = name {
        layered.project_name = Some(name.to_string());
    }
    if layered.project_name.is_none() {
        layered.project_name = Some(PREVIEW_NAME.to_string());
    }

    tracing::debug!(?layered, "project options merged");
    Ok(layered.into_config()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use apismith_core::domain::{AuthMethod, Database, Orm, Structure};
    use tempfile::TempDir;

    #[test]
    fn flags_override_file_and_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("project.toml");
        std::fs::write(
            &path,
            "project_name = \"from-file\"\nstructure = \"flat\"\nauth_method = \"session\"\n",
        )
        .unwrap();

        let args = ProjectArgs {
            from: Some(path),
            auth_method: Some(AuthMethod::Jwt),
            no_examples: true,
            ..ProjectArgs::default()
        };
        let config = resolve_project(None, &args, &AppConfig::default()).unwrap();

        assert_eq!(config.project_name(), "from-file");
        assert_eq!(config.structure(), Structure::Flat);
        assert_eq!(config.auth_method(), AuthMethod::Jwt);
        assert!(!config.include_examples());
        assert_eq!(config.database(), Database::Postgres);
    }

    #[test]
    fn configured_defaults_apply_when_nothing_else_is_set() {
        let mut app = AppConfig::default();
        app.defaults.structure = Structure::DomainDriven;
        app.defaults.database = Database::Sqlite;

        let config = resolve_project(Some("svc"), &ProjectArgs::default(), &app).unwrap();
        assert_eq!(config.structure(), Structure::DomainDriven);
        assert_eq!(config.database(), Database::Sqlite);
        assert_eq!(config.orm(), Orm::SqlAlchemy);
    }

    #[test]
    fn missing_name_falls_back_to_preview() {
        let config =
            resolve_project(None, &ProjectArgs::default(), &AppConfig::default()).unwrap();
        assert_eq!(config.project_name(), PREVIEW_NAME);
    }

    #[test]
    fn absent_switches_keep_file_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("project.json");
        std::fs::write(&path, r#"{"docker": true, "include_examples": false}"#).unwrap();

        let args = ProjectArgs {
            from: Some(path),
            ..ProjectArgs::default()
        };
        let config = resolve_project(Some("svc"), &args, &AppConfig::default()).unwrap();
        assert!(config.docker());
        assert!(!config.include_examples());
    }
}
