//! Project-level files: packaging, README, environment and tooling.

use apismith_core::domain::{MigrationTool, RenderContext, TaskQueue, capabilities};

use super::{Rendered, Source, broker_url, cache_url, database_url, result_backend};
use crate::catalog::ids;

fn quoted_list(packages: &[&str]) -> String {
    packages
        .iter()
        .map(|p| format!("    \"{p}\",\n"))
        .collect()
}

pub(crate) fn pyproject(ctx: &RenderContext<'_>) -> Rendered {
    let config = ctx.config();
    let mut src = Source::new();

    src.block(
        r#"
[build-system]
requires = ["hatchling"]
build-backend = "hatchling.build"

[project]
name = "{{PROJECT_NAME_KEBAB}}"
version = "0.1.0"
description = "{{PROJECT_DESCRIPTION}}"
readme = "README.md"
requires-python = ">={{PYTHON_VERSION}}"
authors = [{ name = "{{AUTHOR_NAME}}", email = "{{AUTHOR_EMAIL}}" }]
dependencies = [
"#,
    )
    .block(&quoted_list(&capabilities::runtime_packages(config)))
    .line("]")
    .blank()
    .line("[project.optional-dependencies]")
    .line("dev = [")
    .block(&quoted_list(&capabilities::dev_packages(config)))
    .line("]")
    .block(
        r#"

[tool.hatch.build.targets.wheel]
packages = ["app"]

[tool.ruff]
line-length = 100
target-version = "{{PYTHON_TAG}}"

[tool.ruff.lint]
select = ["E", "F", "I", "B", "UP", "SIM"]

[tool.pytest.ini_options]
asyncio_mode = "auto"
testpaths = ["tests"]

[tool.mypy]
python_version = "{{PYTHON_VERSION}}"
ignore_missing_imports = true
plugins = ["pydantic.mypy"]
"#,
    );

    if ctx.has(ids::DATABASE) {
        src.blank()
            .line("[tool.aerich]")
            .line(format!(
                "tortoise_orm = \"{}.TORTOISE_ORM\"",
                ctx.module_path(ids::DATABASE)?
            ))
            .line(r#"location = "./migrations""#)
            .line(r#"src_folder = "./.""#);
    }
    Ok(src.finish())
}

pub(crate) fn readme(ctx: &RenderContext<'_>) -> Rendered {
    let config = ctx.config();
    let mut src = Source::new();

    src.line("# {{PROJECT_NAME}}")
        .blank()
        .line("{{PROJECT_DESCRIPTION}}")
        .blank()
        .line("## Stack")
        .blank()
        .line(format!("- FastAPI, {} layout", config.structure()))
        .line(format!("- Python {}", config.python_version()));
    if config.has_database() {
        src.line(format!("- Database: {} via {}", config.database(), config.orm()));
    }
    if config.migration_tool() != MigrationTool::None {
        src.line(format!("- Migrations: {}", config.migration_tool()));
    }
    if config.has_auth() {
        src.line(format!("- Authentication: {}", config.auth_method()));
    }
    if config.has_cache() {
        src.line(format!("- Cache: {}", config.cache_backend()));
    }
    if config.has_tasks() {
        src.line(format!(
            "- Background tasks: {} on {}",
            config.task_queue(),
            config.broker()
        ));
    }
    if config.admin_panel() {
        src.line("- Admin panel: sqladmin at `/admin`");
    }
    src.line(format!("- Logging: {}", config.logging()));

    let main = ctx.module_path(ids::MAIN)?;
    src.block(
        r#"

## Getting started

```bash
python -m venv .venv
source .venv/bin/activate
pip install -e ".[dev]"
cp .env.example .env
```

## Running

```bash
"#,
    )
    .line(format!("uvicorn {main}:app --reload"))
    .block(
        r#"
```

Interactive documentation is served at http://localhost:8000/docs.
"#,
    );

    match config.migration_tool() {
        MigrationTool::Alembic => {
            src.block(
                r#"
## Migrations

```bash
alembic revision --autogenerate -m "create users"
alembic upgrade head
```
"#,
            );
        }
        MigrationTool::Aerich => {
            src.block(
                r#"
## Migrations

```bash
aerich init-db
aerich migrate --name create_users
aerich upgrade
```
"#,
            );
        }
        MigrationTool::None => {}
    }

    if ctx.has(ids::WORKER) {
        let command = match config.task_queue() {
            TaskQueue::Celery => format!(
                "celery -A {}:celery_app worker --loglevel=info",
                ctx.module_path(ids::WORKER)?
            ),
            TaskQueue::Arq => format!("arq {}.WorkerSettings", ctx.module_path(ids::WORKER)?),
            TaskQueue::Dramatiq | TaskQueue::None => {
                format!("dramatiq {}", ctx.module_path(ids::JOBS)?)
            }
        };
        src.blank()
            .line("## Background worker")
            .blank()
            .line("```bash")
            .line(command)
            .line("```");
    }

    src.block(
        r#"

## Tests

```bash
pytest
```
"#,
    );
    if config.docker() {
        src.block(
            r#"
## Docker

```bash
docker compose up --build
```
"#,
        );
    }
    Ok(src.finish())
}

pub(crate) fn gitignore(_: &RenderContext<'_>) -> Rendered {
    Ok(Source::new()
        .block(
            r#"
__pycache__/
*.py[cod]
*.egg-info/
.eggs/
build/
dist/

.venv/
venv/
.env

.pytest_cache/
.mypy_cache/
.ruff_cache/
.coverage
htmlcov/

*.db
*.sqlite3

.idea/
.vscode/
.DS_Store
"#,
        )
        .finish())
}

pub(crate) fn env_example(ctx: &RenderContext<'_>) -> Rendered {
    let config = ctx.config();
    let mut src = Source::new();

    src.line("PROJECT_NAME={{PROJECT_NAME}}")
        .line("DEBUG=false")
        .line("LOG_LEVEL=INFO");
    if config.has_database() {
        src.line(format!("DATABASE_URL={}", database_url(config)));
    }
    if config.has_auth() {
        src.line("SECRET_KEY=change-me-in-production");
    }
    if let Some(url) = cache_url(config, "localhost") {
        src.line(format!("CACHE_URL={url}"));
    }
    if let Some(url) = broker_url(config, "localhost") {
        src.line(format!("BROKER_URL={url}"));
    }
    if config.task_queue() == TaskQueue::Celery {
        if let Some(url) = result_backend(config, "localhost") {
            src.line(format!("RESULT_BACKEND={url}"));
        }
    }
    Ok(src.finish())
}

pub(crate) fn ci_workflow(_: &RenderContext<'_>) -> Rendered {
    Ok(Source::new()
        .block(
            r#"
name: CI

on:
  push:
    branches: [main]
  pull_request:

jobs:
  test:
    runs-on: ubuntu-latest
    steps:
      - uses: actions/checkout@v4
      - uses: actions/setup-python@v5
        with:
          python-version: "{{PYTHON_VERSION}}"
          cache: pip
      - name: Install
        run: pip install -e ".[dev]"
      - name: Lint
        run: ruff check .
      - name: Test
        run: pytest
"#,
        )
        .finish())
}

pub(crate) fn pre_commit(_: &RenderContext<'_>) -> Rendered {
    Ok(Source::new()
        .block(
            r#"
repos:
  - repo: https://github.com/pre-commit/pre-commit-hooks
    rev: v5.0.0
    hooks:
      - id: trailing-whitespace
      - id: end-of-file-fixer
      - id: check-yaml
      - id: check-toml
  - repo: https://github.com/astral-sh/ruff-pre-commit
    rev: v0.7.4
    hooks:
      - id: ruff
        args: [--fix]
      - id: ruff-format
"#,
        )
        .finish())
}
