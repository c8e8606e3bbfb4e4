//! Physical placement of every module per project structure.

use apismith_core::domain::{LayoutEntry, Structure};

use super::ids::*;

pub static LAYOUT: &[LayoutEntry] = &[
    LayoutEntry::shared(APP_PACKAGE, "app/__init__.py"),
    LayoutEntry::shared(MAIN, "app/main.py"),
    LayoutEntry::per_structure(CONFIG, "app/config.py", "app/core/config.py", "app/config.py"),
    LayoutEntry::per_structure(DATABASE, "app/database.py", "app/core/database.py", "app/database.py"),
    LayoutEntry::per_structure(LOGGING, "app/core/logging.py", "app/core/logging.py", "app/logging_config.py"),
    LayoutEntry::per_structure(EXCEPTIONS, "app/core/exceptions.py", "app/core/exceptions.py", "app/exceptions.py"),
    LayoutEntry::per_structure(SECURITY, "app/core/security.py", "app/core/security.py", "app/security.py"),
    LayoutEntry::per_structure(CACHE, "app/core/cache.py", "app/core/cache.py", "app/cache.py"),
    LayoutEntry::per_structure(DEPS, "app/api/deps.py", "app/core/deps.py", "app/deps.py"),
    LayoutEntry::per_structure(ROUTER, "app/api/v1/router.py", "app/api/router.py", "app/routes/__init__.py"),
    LayoutEntry::per_structure(
        HEALTH_ROUTES,
        "app/api/v1/routes/health.py",
        "app/domains/health/routes.py",
        "app/routes/health.py",
    ),
    LayoutEntry::per_structure(
        AUTH_ROUTES,
        "app/api/v1/routes/auth.py",
        "app/domains/auth/routes.py",
        "app/routes/auth.py",
    ),
    LayoutEntry::per_structure(AUTH_SCHEMAS, "app/schemas/auth.py", "app/domains/auth/schemas.py", "app/schemas/auth.py"),
    LayoutEntry::per_structure(USER_MODEL, "app/models/user.py", "app/domains/users/models/user.py", "app/models/user.py"),
    LayoutEntry::per_structure(
        MODELS_PACKAGE,
        "app/models/__init__.py",
        "app/domains/users/models/__init__.py",
        "app/models/__init__.py",
    ),
    LayoutEntry::per_structure(USER_SCHEMAS, "app/schemas/user.py", "app/domains/users/schemas.py", "app/schemas/user.py"),
    LayoutEntry::per_structure(
        USER_REPOSITORY,
        "app/repositories/user.py",
        "app/domains/users/repository.py",
        "app/repositories.py",
    ),
    LayoutEntry::per_structure(USER_SERVICE, "app/services/user.py", "app/domains/users/service.py", "app/services.py"),
    LayoutEntry::per_structure(
        USER_ROUTES,
        "app/api/v1/routes/users.py",
        "app/domains/users/routes.py",
        "app/routes/users.py",
    ),
    LayoutEntry::per_structure(
        TASK_ROUTES,
        "app/api/v1/routes/tasks.py",
        "app/domains/tasks/routes.py",
        "app/routes/tasks.py",
    ),
    LayoutEntry::per_structure(WORKER, "app/workers/worker.py", "app/core/worker.py", "app/worker.py"),
    LayoutEntry::per_structure(JOBS, "app/workers/tasks.py", "app/domains/tasks/jobs.py", "app/tasks.py"),
    LayoutEntry::per_structure(ADMIN, "app/admin/views.py", "app/admin/views.py", "app/admin.py"),
    LayoutEntry::shared(MIGRATIONS_ENV, "migrations/env.py"),
    LayoutEntry::shared(MIGRATIONS_SCRIPT, "migrations/script.py.mako"),
    LayoutEntry::shared(MIGRATIONS_INI, "alembic.ini"),
    LayoutEntry::shared(MIGRATIONS_VERSIONS, "migrations/versions/.gitkeep"),
    LayoutEntry::shared(PRESTART, "scripts/prestart.sh"),
    LayoutEntry::shared(PYPROJECT, "pyproject.toml"),
    LayoutEntry::shared(README, "README.md"),
    LayoutEntry::shared(GITIGNORE, ".gitignore"),
    LayoutEntry::shared(ENV_EXAMPLE, ".env.example"),
    LayoutEntry::shared(DOCKERFILE, "Dockerfile"),
    LayoutEntry::shared(COMPOSE, "docker-compose.yml"),
    LayoutEntry::shared(DOCKERIGNORE, ".dockerignore"),
    LayoutEntry::shared(CI_WORKFLOW, ".github/workflows/ci.yml"),
    LayoutEntry::shared(PRE_COMMIT, ".pre-commit-config.yaml"),
    LayoutEntry::shared(TESTS_PACKAGE, "tests/__init__.py"),
    LayoutEntry::shared(CONFTEST, "tests/conftest.py"),
    LayoutEntry::shared(HEALTH_TESTS, "tests/test_health.py"),
    LayoutEntry::shared(USER_TESTS, "tests/test_users.py"),
    LayoutEntry::shared(AUTH_TESTS, "tests/test_auth.py"),
];

static LAYERED_PACKAGES: &[&str] = &[
    "app/core",
    "app/api",
    "app/api/v1",
    "app/api/v1/routes",
    "app/models",
    "app/schemas",
    "app/services",
    "app/repositories",
];

static DOMAIN_DRIVEN_PACKAGES: &[&str] = &["app/core", "app/api", "app/domains"];

static FLAT_PACKAGES: &[&str] = &["app/routes"];

/// Package directories that exist in every project of `structure`.
pub fn skeleton_packages(structure: Structure) -> &'static [&'static str] {
    match structure {
        Structure::Layered => LAYERED_PACKAGES,
        Structure::DomainDriven => DOMAIN_DRIVEN_PACKAGES,
        Structure::Flat => FLAT_PACKAGES,
    }
}
