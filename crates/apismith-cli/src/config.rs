//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The
//! CLI layer owns it; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (applied by the commands, not here)
//! 2. `APISMITH_*` environment variables, e.g. `APISMITH_DEFAULTS__STRUCTURE=flat`
//!    (a `.env` file in the working directory is loaded first)
//! 3. `.apismith.toml` in the working directory
//! 4. `--config FILE`, or the user config file
//! 5. Built-in defaults

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use apismith_adapters::ProjectFile;
use apismith_core::domain::{AuthMethod, Database, LoggingLibrary, PythonVersion, Structure};

/// Project-local configuration file name.
pub const LOCAL_CONFIG: &str = ".apismith.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Defaults for new projects.
    pub defaults: Defaults,
    pub output: OutputConfig,
    pub sweep: SweepConfig,
}

/// Project options applied when neither a flag nor a `--from` file sets them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub structure: Structure,
    pub database: Database,
    pub auth_method: AuthMethod,
    pub logging: LoggingLibrary,
    pub python_version: PythonVersion,
    pub include_examples: bool,
    pub docker: bool,
    pub github_actions: bool,
    pub pre_commit: bool,
    /// Empty means "use the generator's placeholder".
    pub author_name: String,
    pub author_email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    /// Show a progress bar during sweeps.
    pub progress: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Worker threads; 0 uses one per CPU.
    pub jobs: usize,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            structure: Structure::Layered,
            database: Database::Postgres,
            auth_method: AuthMethod::None,
            logging: LoggingLibrary::Standard,
            python_version: PythonVersion::default(),
            include_examples: true,
            docker: false,
            github_actions: false,
            pre_commit: false,
            author_name: String::new(),
            author_email: String::new(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            progress: true,
        }
    }
}

impl Defaults {
    /// The defaults as the lowest-priority project file layer.
    pub fn as_project_file(&self) -> ProjectFile {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        ProjectFile {
            structure: Some(self.structure),
            database: Some(self.database),
            auth_method: Some(self.auth_method),
            logging: Some(self.logging),
            python_version: Some(self.python_version),
            include_examples: Some(self.include_examples),
            docker: Some(self.docker),
            github_actions: Some(self.github_actions),
            pre_commit: Some(self.pre_commit),
            author_name: non_empty(&self.author_name),
            author_email: non_empty(&self.author_email),
            ..ProjectFile::default()
        }
    }
}

impl AppConfig {
    /// Load configuration, layering every source over the built-in defaults.
    ///
    /// `config_file` is the path passed via `--config`; it must exist when
    /// given. The default locations are optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let mut builder = Config::builder().add_source(
            Config::try_from(&Self::default()).context("serialising built-in defaults")?,
        );

        builder = match config_file {
            Some(path) => builder.add_source(File::from(path.as_path()).required(true)),
            None => builder
                .add_source(File::from(Self::config_path()).required(false))
                .add_source(File::from(Path::new(LOCAL_CONFIG)).required(false)),
        };

        builder
            .add_source(
                Environment::with_prefix("APISMITH")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .context("reading configuration sources")?
            .try_deserialize()
            .context("invalid configuration")
    }

    /// Path to the user configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.apismith.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "apismith", "apismith")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG))
    }

    /// The file `config set` edits: `--config`, else a local file if one
    /// exists, else the user file.
    pub fn active_path(config_file: Option<&PathBuf>) -> PathBuf {
        match config_file {
            Some(path) => path.clone(),
            None if Path::new(LOCAL_CONFIG).is_file() => PathBuf::from(LOCAL_CONFIG),
            None => Self::config_path(),
        }
    }
}
