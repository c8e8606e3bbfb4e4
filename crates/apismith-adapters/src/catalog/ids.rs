//! Identifiers of the built-in logical modules.

use apismith_core::domain::ModuleId;

pub const APP_PACKAGE: ModuleId = ModuleId::new("app.package");
pub const MAIN: ModuleId = ModuleId::new("app.main");
pub const CONFIG: ModuleId = ModuleId::new("app.config");
pub const DATABASE: ModuleId = ModuleId::new("app.database");

pub const LOGGING: ModuleId = ModuleId::new("core.logging");
pub const EXCEPTIONS: ModuleId = ModuleId::new("core.exceptions");
pub const SECURITY: ModuleId = ModuleId::new("core.security");
pub const CACHE: ModuleId = ModuleId::new("core.cache");

pub const DEPS: ModuleId = ModuleId::new("api.deps");
pub const ROUTER: ModuleId = ModuleId::new("api.router");
pub const HEALTH_ROUTES: ModuleId = ModuleId::new("routes.health");
pub const AUTH_ROUTES: ModuleId = ModuleId::new("routes.auth");
pub const AUTH_SCHEMAS: ModuleId = ModuleId::new("schemas.auth");

pub const USER_MODEL: ModuleId = ModuleId::new("models.user");
pub const MODELS_PACKAGE: ModuleId = ModuleId::new("models.package");
pub const USER_SCHEMAS: ModuleId = ModuleId::new("schemas.user");
pub const USER_REPOSITORY: ModuleId = ModuleId::new("repositories.user");
pub const USER_SERVICE: ModuleId = ModuleId::new("services.user");
pub const USER_ROUTES: ModuleId = ModuleId::new("routes.users");

pub const TASK_ROUTES: ModuleId = ModuleId::new("routes.tasks");
pub const WORKER: ModuleId = ModuleId::new("tasks.worker");
pub const JOBS: ModuleId = ModuleId::new("tasks.jobs");

pub const ADMIN: ModuleId = ModuleId::new("admin.views");

pub const MIGRATIONS_ENV: ModuleId = ModuleId::new("migrations.env");
pub const MIGRATIONS_SCRIPT: ModuleId = ModuleId::new("migrations.script");
pub const MIGRATIONS_INI: ModuleId = ModuleId::new("migrations.ini");
pub const MIGRATIONS_VERSIONS: ModuleId = ModuleId::new("migrations.versions");
pub const PRESTART: ModuleId = ModuleId::new("scripts.prestart");

pub const PYPROJECT: ModuleId = ModuleId::new("project.pyproject");
pub const README: ModuleId = ModuleId::new("project.readme");
pub const GITIGNORE: ModuleId = ModuleId::new("project.gitignore");
pub const ENV_EXAMPLE: ModuleId = ModuleId::new("project.env");

pub const DOCKERFILE: ModuleId = ModuleId::new("deploy.dockerfile");
pub const COMPOSE: ModuleId = ModuleId::new("deploy.compose");
pub const DOCKERIGNORE: ModuleId = ModuleId::new("deploy.dockerignore");
pub const CI_WORKFLOW: ModuleId = ModuleId::new("ci.workflow");
pub const PRE_COMMIT: ModuleId = ModuleId::new("tooling.precommit");

pub const TESTS_PACKAGE: ModuleId = ModuleId::new("tests.package");
pub const CONFTEST: ModuleId = ModuleId::new("tests.conftest");
pub const HEALTH_TESTS: ModuleId = ModuleId::new("tests.health");
pub const USER_TESTS: ModuleId = ModuleId::new("tests.users");
pub const AUTH_TESTS: ModuleId = ModuleId::new("tests.auth");
