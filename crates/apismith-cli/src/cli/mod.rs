//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases
//! and help text. No business logic lives here. Option values are parsed
//! with the core types' own `FromStr` impls, so aliases such as `ddd` or
//! `pg` behave the same here and in project files.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use apismith_core::domain::{
    AuthMethod, Broker, CacheBackend, Database, LoggingLibrary, MigrationTool, Orm, PythonVersion,
    Structure, TaskQueue,
};

pub mod global;
pub use global::GlobalArgs;

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name     = "apismith",
    bin_name = "apismith",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{26a1} Consistent FastAPI project skeletons",
    long_about = "apismith generates FastAPI project skeletons from a handful of options \
                  and proves that every in-project import in the result resolves.",
    after_help = "EXAMPLES:\n\
        \x20 apismith new shop-api --structure ddd --auth jwt --cache redis\n\
        \x20 apismith new jobs-api --orm tortoise --task-queue arq --docker\n\
        \x20 apismith verify --dir ./shop-api\n\
        \x20 apismith sweep --jobs 8\n\
        \x20 apismith completions bash > ~/.local/share/bash-completion/completions/apismith",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new project.
    #[command(
        visible_alias = "n",
        after_help = "EXAMPLES:\n\
            \x20 apismith new shop-api\n\
            \x20 apismith new shop-api --structure flat --database sqlite --no-examples\n\
            \x20 apismith new shop-api --from project.toml --yes\n\
            \x20 apismith new shop-api --dry-run"
    )]
    New(NewArgs),

    /// Check that every in-project import resolves.
    #[command(after_help = "EXAMPLES:\n\
            \x20 apismith verify --dir ./shop-api\n\
            \x20 apismith verify --structure ddd --auth oauth2 --admin\n\
            \x20 apismith verify --from project.toml --format json")]
    Verify(VerifyArgs),

    /// Generate and verify every combination of the given options.
    #[command(after_help = "EXAMPLES:\n\
            \x20 apismith sweep\n\
            \x20 apismith sweep --structures flat,ddd --orms sqlmodel --auth jwt,none\n\
            \x20 apismith sweep --exhaustive --jobs 8 --format json > sweep.json")]
    Sweep(SweepArgs),

    /// List catalog modules, their inclusion and resolved paths.
    #[command(
        visible_alias = "ls",
        after_help = "EXAMPLES:\n\
            \x20 apismith modules\n\
            \x20 apismith modules --structure flat --auth jwt\n\
            \x20 apismith modules --all --format json"
    )]
    Modules(ModulesArgs),

    /// Write a default apismith configuration file.
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(after_help = "EXAMPLES:\n\
            \x20 apismith completions bash > ~/.local/share/bash-completion/completions/apismith\n\
            \x20 apismith completions zsh  > ~/.zfunc/_apismith\n\
            \x20 apismith completions fish > ~/.config/fish/completions/apismith.fish")]
    Completions(CompletionsArgs),

    /// Manage the apismith configuration.
    #[command(
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 apismith config get defaults.structure\n\
            \x20 apismith config set defaults.structure domain-driven\n\
            \x20 apismith config list"
    )]
    Config(ConfigCommands),
}

// ── project options ───────────────────────────────────────────────────────────

/// Project configuration flags shared by `new`, `verify` and `modules`.
///
/// Every option is optional: unset values fall back to the `--from` file,
/// then to the configured defaults, then to inference.
#[derive(Debug, Clone, Default, Args)]
pub struct ProjectArgs {
    /// Read project options from a `.toml` or `.json` file.
    #[arg(long = "from", value_name = "FILE")]
    pub from: Option<PathBuf>,

    /// Directory layout: layered, domain-driven (ddd), flat.
    #[arg(short = 's', long = "structure", value_name = "STRUCTURE")]
    pub structure: Option<Structure>,

    /// Database: postgres, mysql, sqlite, none.
    #[arg(short = 'd', long = "database", value_name = "DATABASE")]
    pub database: Option<Database>,

    /// ORM: sqlalchemy, sqlmodel, tortoise, none (inferred from the database).
    #[arg(long = "orm", value_name = "ORM")]
    pub orm: Option<Orm>,

    /// Migration tool: alembic, aerich, none (inferred from the ORM).
    #[arg(long = "migrations", value_name = "TOOL")]
    pub migration_tool: Option<MigrationTool>,

    /// Authentication: jwt, oauth2, session, none.
    #[arg(short = 'a', long = "auth", value_name = "METHOD")]
    pub auth_method: Option<AuthMethod>,

    /// Mount an sqladmin panel.
    #[arg(long = "admin")]
    pub admin_panel: bool,

    /// Cache backend: redis, memcached, in-memory, none.
    #[arg(long = "cache", value_name = "BACKEND")]
    pub cache_backend: Option<CacheBackend>,

    /// Task queue: celery, arq, dramatiq, none.
    #[arg(long = "task-queue", value_name = "QUEUE")]
    pub task_queue: Option<TaskQueue>,

    /// Message broker: redis, rabbitmq, none (inferred from the task queue).
    #[arg(long = "broker", value_name = "BROKER")]
    pub broker: Option<Broker>,

    /// Logging library: standard, loguru, structlog.
    #[arg(long = "logging", value_name = "LIBRARY")]
    pub logging: Option<LoggingLibrary>,

    /// Python version: 3.10 to 3.13.
    #[arg(long = "python", value_name = "VERSION")]
    pub python_version: Option<PythonVersion>,

    /// Leave out the example user domain and task endpoints.
    #[arg(long = "no-examples")]
    pub no_examples: bool,

    /// Add a Dockerfile and compose stack.
    #[arg(long = "docker")]
    pub docker: bool,

    /// Add a GitHub Actions workflow.
    #[arg(long = "github-actions")]
    pub github_actions: bool,

    /// Add pre-commit hooks.
    #[arg(long = "pre-commit")]
    pub pre_commit: bool,

    /// One-line project description.
    #[arg(long = "description", value_name = "TEXT")]
    pub description: Option<String>,

    /// Author name written to pyproject.toml.
    #[arg(long = "author", value_name = "NAME")]
    pub author_name: Option<String>,

    /// Author email written to pyproject.toml.
    #[arg(long = "email", value_name = "EMAIL")]
    pub author_email: Option<String>,
}

// ── new ───────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Project name or path. A plain name creates `./name`; a path like
    /// `../foo` places the project one level up.
    #[arg(value_name = "NAME", help = "Project name or path")]
    pub name: String,

    #[command(flatten)]
    pub project: ProjectArgs,

    #[arg(short = 'y', long = "yes", help = "Skip confirmation and create immediately")]
    pub yes: bool,

    /// Overwrite an existing directory (destructive).
    #[arg(long = "force", help = "Write into an existing directory (other files are kept)")]
    pub force: bool,

    /// Preview what would be created without writing any files.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,

    /// Refuse to write a project with unresolved imports.
    #[arg(long = "strict")]
    pub strict: bool,
}

// ── verify ────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct VerifyArgs {
    /// Verify a project on disk instead of generating one.
    #[arg(long = "dir", value_name = "PATH", conflicts_with = "from")]
    pub dir: Option<PathBuf>,

    #[command(flatten)]
    pub project: ProjectArgs,

    #[arg(long = "format", value_enum, default_value = "human")]
    pub format: ReportFormat,
}

// ── sweep ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SweepArgs {
    /// Start from every value on every axis instead of the default sweep.
    #[arg(long = "exhaustive")]
    pub exhaustive: bool,

    #[arg(long = "structures", value_delimiter = ',', value_name = "LIST")]
    pub structures: Vec<Structure>,

    #[arg(long = "databases", value_delimiter = ',', value_name = "LIST")]
    pub databases: Vec<Database>,

    #[arg(long = "orms", value_delimiter = ',', value_name = "LIST")]
    pub orms: Vec<Orm>,

    /// Migration tools to pin; inferred from the ORM when omitted.
    #[arg(long = "migrations", value_delimiter = ',', value_name = "LIST")]
    pub migration_tools: Vec<MigrationTool>,

    #[arg(long = "auth", value_delimiter = ',', value_name = "LIST")]
    pub auth_methods: Vec<AuthMethod>,

    #[arg(long = "caches", value_delimiter = ',', value_name = "LIST")]
    pub cache_backends: Vec<CacheBackend>,

    #[arg(long = "task-queues", value_delimiter = ',', value_name = "LIST")]
    pub task_queues: Vec<TaskQueue>,

    /// Brokers to pin; inferred from the task queue when omitted.
    #[arg(long = "brokers", value_delimiter = ',', value_name = "LIST")]
    pub brokers: Vec<Broker>,

    #[arg(long = "logging", value_delimiter = ',', value_name = "LIST")]
    pub logging: Vec<LoggingLibrary>,

    #[arg(long = "examples", value_delimiter = ',', value_name = "BOOLS")]
    pub include_examples: Vec<bool>,

    #[arg(long = "admin", value_delimiter = ',', value_name = "BOOLS")]
    pub admin_panel: Vec<bool>,

    #[arg(long = "docker", value_delimiter = ',', value_name = "BOOLS")]
    pub docker: Vec<bool>,

    #[arg(long = "github-actions", value_delimiter = ',', value_name = "BOOLS")]
    pub github_actions: Vec<bool>,

    #[arg(long = "pre-commit", value_delimiter = ',', value_name = "BOOLS")]
    pub pre_commit: Vec<bool>,

    #[arg(long = "python-versions", value_delimiter = ',', value_name = "LIST")]
    pub python_versions: Vec<PythonVersion>,

    /// Worker threads (default: one per CPU, or `sweep.jobs` from the config).
    #[arg(short = 'j', long = "jobs", value_name = "N")]
    pub jobs: Option<usize>,

    #[arg(long = "format", value_enum, default_value = "human")]
    pub format: ReportFormat,

    /// Hide the progress bar.
    #[arg(long = "no-progress")]
    pub no_progress: bool,
}

/// Output format for `verify` and `sweep` reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable summary.
    Human,
    /// Machine-readable JSON on stdout.
    Json,
}

// ── modules ───────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ModulesArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Also list modules the configuration leaves out.
    #[arg(long = "all")]
    pub all: bool,

    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: ListFormat,
}

/// Output format for the `modules` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// JSON array.
    Json,
}

// ── init ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write `.apismith.toml` in the current directory instead of the user
    /// configuration directory.
    #[arg(long = "local", help = "Create local configuration in current directory")]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.structure`.
        key: String,
    },
    /// Set a configuration key to a value.
    Set {
        /// Dotted key path.
        key: String,
        /// New value.
        value: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
