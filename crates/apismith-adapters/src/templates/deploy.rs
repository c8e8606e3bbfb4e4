//! Container build and local compose stack.

use apismith_core::domain::{
    Broker, CacheBackend, Database, MigrationTool, RenderContext, TaskQueue, capabilities,
};

use super::{Rendered, Source, broker_url, cache_url, database_url, result_backend};
use crate::catalog::ids;

pub(crate) fn dockerfile(ctx: &RenderContext<'_>) -> Rendered {
    let mut src = Source::new();
    src.block(
        r#"
FROM python:{{PYTHON_VERSION}}-slim

ENV PYTHONDONTWRITEBYTECODE=1 \
    PYTHONUNBUFFERED=1 \
    PIP_NO_CACHE_DIR=1

WORKDIR /srv

COPY pyproject.toml README.md ./
COPY app ./app
RUN pip install --upgrade pip && pip install .
"#,
    );
    if ctx.config().migration_tool() == MigrationTool::Alembic {
        src.line("COPY alembic.ini ./").line("COPY migrations ./migrations");
    }
    src.blank()
        .line("EXPOSE 8000")
        .blank()
        .line(format!(
            "CMD [\"uvicorn\", \"{}:app\", \"--host\", \"0.0.0.0\", \"--port\", \"8000\"]",
            ctx.module_path(ids::MAIN)?
        ));
    Ok(src.finish())
}

/// Hostname of the compose service backing the cache.
fn cache_host(backend: CacheBackend) -> &'static str {
    match backend {
        CacheBackend::Memcached => "memcached",
        _ => "redis",
    }
}

fn broker_host(broker: Broker) -> &'static str {
    match broker {
        Broker::RabbitMq => "rabbitmq",
        _ => "redis",
    }
}

pub(crate) fn compose(ctx: &RenderContext<'_>) -> Rendered {
    let config = ctx.config();
    let image = capabilities::find_database(config.database()).and_then(|d| d.image);
    let needs_redis = config.cache_backend() == CacheBackend::Redis
        || (config.has_tasks() && config.broker() == Broker::Redis);
    let needs_memcached = config.cache_backend() == CacheBackend::Memcached;
    let needs_rabbitmq = config.has_tasks() && config.broker() == Broker::RabbitMq;

    let mut environment = Vec::new();
    if config.has_database() {
        environment.push(format!(
            "DATABASE_URL: \"{}\"",
            database_url(config).replace("localhost", "db")
        ));
    }
    if config.has_auth() {
        environment.push("SECRET_KEY: \"change-me-in-production\"".to_string());
    }
    if let Some(url) = cache_url(config, cache_host(config.cache_backend())) {
        environment.push(format!("CACHE_URL: \"{url}\""));
    }
    let host = broker_host(config.broker());
    if let Some(url) = broker_url(config, host) {
        environment.push(format!("BROKER_URL: \"{url}\""));
    }
    if config.task_queue() == TaskQueue::Celery {
        if let Some(url) = result_backend(config, host) {
            environment.push(format!("RESULT_BACKEND: \"{url}\""));
        }
    }

    let mut depends_on = Vec::new();
    if image.is_some() {
        depends_on.push("db");
    }
    if needs_redis {
        depends_on.push("redis");
    }
    if needs_memcached {
        depends_on.push("memcached");
    }
    if needs_rabbitmq {
        depends_on.push("rabbitmq");
    }

    let service_body = |src: &mut Source| {
        if !environment.is_empty() {
            src.line("    environment:");
            for entry in &environment {
                src.line(format!("      {entry}"));
            }
        }
        if !depends_on.is_empty() {
            src.line("    depends_on:");
            for service in &depends_on {
                src.line(format!("      - {service}"));
            }
        }
    };

    let mut src = Source::new();
    src.line("services:")
        .line("  api:")
        .line("    build: .")
        .line("    ports:")
        .line(r#"      - "8000:8000""#);
    service_body(&mut src);

    if ctx.has(ids::WORKER) {
        let command = match config.task_queue() {
            TaskQueue::Celery => format!(
                "[\"celery\", \"-A\", \"{}:celery_app\", \"worker\", \"--loglevel=info\"]",
                ctx.module_path(ids::WORKER)?
            ),
            TaskQueue::Arq => format!(
                "[\"arq\", \"{}.WorkerSettings\"]",
                ctx.module_path(ids::WORKER)?
            ),
            TaskQueue::Dramatiq | TaskQueue::None => {
                format!("[\"dramatiq\", \"{}\"]", ctx.module_path(ids::JOBS)?)
            }
        };
        src.blank()
            .line("  worker:")
            .line("    build: .")
            .line(format!("    command: {command}"));
        service_body(&mut src);
    }

    if let Some(image) = image {
        src.blank()
            .line("  db:")
            .line(format!("    image: {image}"))
            .line("    environment:");
        match config.database() {
            Database::MySql => {
                src.line("      MYSQL_ROOT_PASSWORD: root")
                    .line("      MYSQL_DATABASE: {{PROJECT_NAME_SNAKE}}")
                    .line("    volumes:")
                    .line("      - db-data:/var/lib/mysql");
            }
            _ => {
                src.line("      POSTGRES_USER: postgres")
                    .line("      POSTGRES_PASSWORD: postgres")
                    .line("      POSTGRES_DB: {{PROJECT_NAME_SNAKE}}")
                    .line("    volumes:")
                    .line("      - db-data:/var/lib/postgresql/data");
            }
        }
    }
    if needs_redis {
        src.blank().line("  redis:").line("    image: redis:7-alpine");
    }
    if needs_memcached {
        src.blank()
            .line("  memcached:")
            .line("    image: memcached:1.6-alpine");
    }
    if needs_rabbitmq {
        src.blank()
            .line("  rabbitmq:")
            .line("    image: rabbitmq:3.13-management-alpine")
            .line("    ports:")
            .line(r#"      - "15672:15672""#);
    }

    if image.is_some() {
        src.blank().line("volumes:").line("  db-data:");
    }
    Ok(src.finish())
}

pub(crate) fn dockerignore(_: &RenderContext<'_>) -> Rendered {
    Ok(Source::new()
        .block(
            r#"
.git
.venv
venv
__pycache__
*.py[cod]
.pytest_cache
.mypy_cache
.ruff_cache
.env
*.db
tests
"#,
        )
        .finish())
}
