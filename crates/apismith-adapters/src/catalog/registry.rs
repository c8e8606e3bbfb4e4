//! The module registry: every logical module with its inclusion rule,
//! guarded dependencies and template.

use apismith_core::domain::{
    Dependency, LogicalModule, Permissions, Predicate, TemplateFn, always,
};

use super::ids::*;
use super::predicates as when;
use crate::templates::{admin, api, app, deploy, infra, migrations, project, tasks, tests, users};

const fn module(
    id: apismith_core::domain::ModuleId,
    description: &'static str,
    include: Predicate,
    dependencies: &'static [Dependency],
    template: TemplateFn,
) -> LogicalModule {
    LogicalModule {
        id,
        description,
        include,
        dependencies,
        template,
        permissions: Permissions::read_write(),
    }
}

// ── Dependencies ─────────────────────────────────────────────────────────────

static ON_CONFIG: &[Dependency] = &[Dependency::always(CONFIG)];

static MAIN_DEPS: &[Dependency] = &[
    Dependency::always(CONFIG),
    Dependency::always(LOGGING),
    Dependency::always(EXCEPTIONS),
    Dependency::always(ROUTER),
    Dependency::when(DATABASE, when::db),
    Dependency::when(CACHE, when::cache),
    Dependency::when(ADMIN, when::admin),
];

static DATABASE_DEPS: &[Dependency] = &[
    Dependency::always(CONFIG),
    Dependency::when(MODELS_PACKAGE, when::unmanaged_models),
    Dependency::when(USER_MODEL, when::tortoise_examples),
];

static API_DEPS_DEPS: &[Dependency] = &[
    Dependency::when(DATABASE, when::sql),
    Dependency::when(SECURITY, when::auth),
    Dependency::when(USER_MODEL, when::auth_with_examples),
    Dependency::when(USER_REPOSITORY, when::auth_with_examples),
];

static ROUTER_DEPS: &[Dependency] = &[
    Dependency::always(HEALTH_ROUTES),
    Dependency::when(AUTH_ROUTES, when::auth),
    Dependency::when(USER_ROUTES, when::examples),
    Dependency::when(TASK_ROUTES, when::example_tasks),
];

static HEALTH_DEPS: &[Dependency] = &[
    Dependency::always(CONFIG),
    Dependency::when(DATABASE, when::db),
    Dependency::when(CACHE, when::cache),
];

static AUTH_ROUTES_DEPS: &[Dependency] = &[
    Dependency::always(CONFIG),
    Dependency::always(SECURITY),
    Dependency::always(AUTH_SCHEMAS),
    Dependency::always(DEPS),
    Dependency::when(USER_SERVICE, when::examples),
    Dependency::when(USER_SCHEMAS, when::examples),
];

static USER_MODEL_DEPS: &[Dependency] = &[Dependency::when(DATABASE, when::declarative_base)];

static MODELS_PACKAGE_DEPS: &[Dependency] = &[Dependency::always(USER_MODEL)];

static REPOSITORY_DEPS: &[Dependency] = &[
    Dependency::always(USER_MODEL),
    Dependency::always(USER_SCHEMAS),
];

static SERVICE_DEPS: &[Dependency] = &[
    Dependency::always(USER_REPOSITORY),
    Dependency::always(USER_SCHEMAS),
    Dependency::always(USER_MODEL),
    Dependency::always(EXCEPTIONS),
    Dependency::when(SECURITY, when::auth),
];

static USER_ROUTES_DEPS: &[Dependency] = &[
    Dependency::when(DEPS, when::sql_or_auth),
    Dependency::always(USER_SERVICE),
    Dependency::always(USER_SCHEMAS),
];

static TASK_ROUTES_DEPS: &[Dependency] = &[
    Dependency::when(JOBS, when::celery_or_dramatiq),
    Dependency::when(WORKER, when::arq),
];

static WORKER_DEPS: &[Dependency] = &[
    Dependency::always(CONFIG),
    Dependency::when(JOBS, when::celery_or_arq),
];

static JOBS_DEPS: &[Dependency] = &[Dependency::when(WORKER, when::celery_or_dramatiq)];

static ADMIN_DEPS: &[Dependency] = &[
    Dependency::always(DATABASE),
    Dependency::when(USER_MODEL, when::include_examples),
    Dependency::when(SECURITY, when::auth),
];

static MIGRATIONS_ENV_DEPS: &[Dependency] = &[
    Dependency::always(CONFIG),
    Dependency::when(DATABASE, when::declarative_base),
    Dependency::when(MODELS_PACKAGE, when::examples),
];

static PYPROJECT_DEPS: &[Dependency] = &[Dependency::when(DATABASE, when::aerich)];

/// Entry points named by the README and compose commands.
static COMMAND_DEPS: &[Dependency] = &[
    Dependency::always(MAIN),
    Dependency::when(WORKER, when::tasks),
    Dependency::when(JOBS, when::dramatiq),
];

static ON_MAIN: &[Dependency] = &[Dependency::always(MAIN)];

static ON_SECURITY: &[Dependency] = &[Dependency::always(SECURITY)];

// ── Registry ─────────────────────────────────────────────────────────────────

pub static REGISTRY: &[LogicalModule] = &[
    // Application
    module(APP_PACKAGE, "application package", always, &[], app::package),
    module(MAIN, "FastAPI application and lifespan", always, MAIN_DEPS, app::main),
    module(CONFIG, "pydantic settings", always, &[], app::settings),
    module(DATABASE, "engine, sessions and schema setup", when::db, DATABASE_DEPS, app::database),
    // Core
    module(LOGGING, "logging setup", always, ON_CONFIG, infra::logging),
    module(EXCEPTIONS, "application errors and handlers", always, &[], infra::exceptions),
    module(SECURITY, "password hashing and tokens", when::auth, ON_CONFIG, infra::security),
    module(CACHE, "cache client", when::cache, ON_CONFIG, infra::cache),
    // HTTP
    module(DEPS, "request dependencies", when::sql_or_auth, API_DEPS_DEPS, api::deps),
    module(ROUTER, "API router", always, ROUTER_DEPS, api::router),
    module(HEALTH_ROUTES, "health endpoint", always, HEALTH_DEPS, api::health),
    module(AUTH_ROUTES, "login endpoints", when::auth, AUTH_ROUTES_DEPS, api::auth_routes),
    module(AUTH_SCHEMAS, "token and login schemas", when::auth, &[], api::auth_schemas),
    // Example user domain
    module(USER_MODEL, "user model", when::examples, USER_MODEL_DEPS, users::model),
    module(MODELS_PACKAGE, "models package", when::examples, MODELS_PACKAGE_DEPS, users::models_package),
    module(USER_SCHEMAS, "user schemas", when::examples, &[], users::schemas),
    module(USER_REPOSITORY, "user repository", when::examples, REPOSITORY_DEPS, users::repository),
    module(USER_SERVICE, "user service", when::examples, SERVICE_DEPS, users::service),
    module(USER_ROUTES, "user CRUD endpoints", when::examples, USER_ROUTES_DEPS, users::routes),
    // Background tasks
    module(TASK_ROUTES, "task endpoints", when::example_tasks, TASK_ROUTES_DEPS, tasks::routes),
    module(WORKER, "queue worker", when::tasks, WORKER_DEPS, tasks::worker),
    module(JOBS, "queue jobs", when::tasks, JOBS_DEPS, tasks::jobs),
    // Admin
    module(ADMIN, "sqladmin views", when::admin, ADMIN_DEPS, admin::views),
    // Migrations
    module(MIGRATIONS_ENV, "alembic environment", when::alembic, MIGRATIONS_ENV_DEPS, migrations::env),
    module(MIGRATIONS_SCRIPT, "alembic revision template", when::alembic, &[], migrations::script),
    module(MIGRATIONS_INI, "alembic configuration", when::alembic, &[], migrations::ini),
    module(MIGRATIONS_VERSIONS, "alembic versions directory", when::alembic, &[], migrations::versions_keep),
    LogicalModule {
        id: PRESTART,
        description: "apply migrations before start",
        include: when::migrations,
        dependencies: &[],
        template: migrations::prestart,
        permissions: Permissions::executable(),
    },
    // Project files
    module(PYPROJECT, "packaging and tool configuration", always, PYPROJECT_DEPS, project::pyproject),
    module(README, "project README", always, COMMAND_DEPS, project::readme),
    module(GITIGNORE, "git ignore rules", always, &[], project::gitignore),
    module(ENV_EXAMPLE, "example environment", always, &[], project::env_example),
    // Deployment and tooling
    module(DOCKERFILE, "container image", when::docker, ON_MAIN, deploy::dockerfile),
    module(COMPOSE, "local compose stack", when::docker, COMMAND_DEPS, deploy::compose),
    module(DOCKERIGNORE, "docker ignore rules", when::docker, &[], deploy::dockerignore),
    module(CI_WORKFLOW, "GitHub Actions workflow", when::github_actions, &[], project::ci_workflow),
    module(PRE_COMMIT, "pre-commit hooks", when::pre_commit, &[], project::pre_commit),
    // Tests
    module(TESTS_PACKAGE, "tests package", always, &[], tests::package),
    module(CONFTEST, "pytest fixtures", always, ON_MAIN, tests::conftest),
    module(HEALTH_TESTS, "health tests", always, &[], tests::health),
    module(USER_TESTS, "user endpoint tests", when::examples, &[], tests::users),
    module(AUTH_TESTS, "authentication tests", when::auth, ON_SECURITY, tests::auth),
];
