//! Application entry points: package, settings, main and database.

use apismith_core::domain::{AuthMethod, MigrationTool, Orm, RenderContext, TaskQueue};

use super::{Rendered, Source, broker_url, cache_url, database_url, result_backend};
use crate::catalog::ids;

pub(crate) fn package(_: &RenderContext<'_>) -> Rendered {
    Ok(Source::new()
        .line(r#""""{{PROJECT_DESCRIPTION}}""""#)
        .blank()
        .line(r#"__version__ = "0.1.0""#)
        .finish())
}

pub(crate) fn main(ctx: &RenderContext<'_>) -> Rendered {
    let config = ctx.config();
    let mut src = Source::new();

    src.block(
        r#"
from collections.abc import AsyncIterator
from contextlib import asynccontextmanager

from fastapi import FastAPI
from fastapi.middleware.cors import CORSMiddleware

"#,
    );
    if ctx.has(ids::ADMIN) {
        src.from(ctx.import(ids::ADMIN)?, "setup_admin");
    }
    src.from(ctx.import(ids::ROUTER)?, "api_router");
    if ctx.has(ids::CACHE) {
        src.from(ctx.import(ids::CACHE)?, "close_cache, init_cache");
    }
    src.from(ctx.import(ids::CONFIG)?, "settings");
    if ctx.has(ids::DATABASE) {
        src.from(ctx.import(ids::DATABASE)?, "close_db, init_db");
    }
    src.from(ctx.import(ids::EXCEPTIONS)?, "register_exception_handlers");
    src.from(ctx.import(ids::LOGGING)?, "get_logger, setup_logging");

    src.block(
        r#"

setup_logging()
logger = get_logger(__name__)


@asynccontextmanager
async def lifespan(_: FastAPI) -> AsyncIterator[None]:
    logger.info(f"Starting {settings.PROJECT_NAME} v{settings.VERSION}")
"#,
    );
    if config.has_database() {
        src.line("    await init_db()");
    }
    if config.has_cache() {
        src.line("    await init_cache()");
    }
    src.line("    yield");
    if config.has_cache() {
        src.line("    await close_cache()");
    }
    if config.has_database() {
        src.line("    await close_db()");
    }
    src.line(r#"    logger.info("Shutdown complete")"#);

    src.block(
        r#"

app = FastAPI(
    title=settings.PROJECT_NAME,
    version=settings.VERSION,
    openapi_url=f"{settings.API_V1_PREFIX}/openapi.json",
    lifespan=lifespan,
)

app.add_middleware(
    CORSMiddleware,
    allow_origins=settings.CORS_ORIGINS,
    allow_credentials=True,
    allow_methods=["*"],
    allow_headers=["*"],
)

register_exception_handlers(app)
app.include_router(api_router, prefix=settings.API_V1_PREFIX)
"#,
    );
    if ctx.has(ids::ADMIN) {
        src.line("setup_admin(app)");
    }

    src.block(
        r#"


@app.get("/", include_in_schema=False)
async def root() -> dict[str, str]:
    return {"name": settings.PROJECT_NAME, "docs": "/docs"}
"#,
    );
    Ok(src.finish())
}

pub(crate) fn settings(ctx: &RenderContext<'_>) -> Rendered {
    let config = ctx.config();
    let mut src = Source::new();

    src.block(
        r#"
from functools import lru_cache

from pydantic_settings import BaseSettings, SettingsConfigDict


class Settings(BaseSettings):
    model_config = SettingsConfigDict(
        env_file=".env",
        env_file_encoding="utf-8",
        extra="ignore",
    )

    PROJECT_NAME: str = "{{PROJECT_NAME}}"
    VERSION: str = "0.1.0"
    DEBUG: bool = False
    API_V1_PREFIX: str = "/api/v1"
    LOG_LEVEL: str = "INFO"
    CORS_ORIGINS: list[str] = ["http://localhost:3000"]
"#,
    );

    if config.has_database() {
        src.blank()
            .line("    # Database")
            .line(format!("    DATABASE_URL: str = \"{}\"", database_url(config)));
    }

    if config.has_auth() {
        src.blank()
            .line("    # Authentication")
            .line(r#"    SECRET_KEY: str = "change-me-in-production""#);
        match config.auth_method() {
            AuthMethod::Session => {
                src.line(r#"    SESSION_COOKIE_NAME: str = "session""#)
                    .line("    SESSION_MAX_AGE_SECONDS: int = 60 * 60 * 24");
            }
            _ => {
                src.line(r#"    ALGORITHM: str = "HS256""#)
                    .line("    ACCESS_TOKEN_EXPIRE_MINUTES: int = 30");
            }
        }
        if !config.has_user_examples() {
            src.line(r#"    DEMO_USERNAME: str = "admin""#)
                .line(r#"    DEMO_PASSWORD: str = "change-me""#);
        }
    }

    if let Some(url) = cache_url(config, "localhost") {
        src.blank()
            .line("    # Cache")
            .line(format!("    CACHE_URL: str = \"{url}\""))
            .line("    CACHE_TTL_SECONDS: int = 300");
    }

    if let Some(url) = broker_url(config, "localhost") {
        src.blank()
            .line("    # Background tasks")
            .line(format!("    BROKER_URL: str = \"{url}\""));
        if config.task_queue() == TaskQueue::Celery {
            if let Some(backend) = result_backend(config, "localhost") {
                src.line(format!("    RESULT_BACKEND: str = \"{backend}\""));
            }
        }
    }

    src.block(
        r#"


@lru_cache
def get_settings() -> Settings:
    return Settings()


settings = get_settings()
"#,
    );
    Ok(src.finish())
}

pub(crate) fn database(ctx: &RenderContext<'_>) -> Rendered {
    match ctx.config().orm() {
        Orm::Tortoise => tortoise_database(ctx),
        _ => sql_database(ctx),
    }
}

fn sql_database(ctx: &RenderContext<'_>) -> Rendered {
    let config = ctx.config();
    let sqlmodel = config.orm() == Orm::SqlModel;
    let mut src = Source::new();

    src.line("from collections.abc import AsyncGenerator").blank();
    src.line("from sqlalchemy import text");
    if sqlmodel {
        src.line("from sqlalchemy.ext.asyncio import async_sessionmaker, create_async_engine")
            .line("from sqlmodel import SQLModel")
            .line("from sqlmodel.ext.asyncio.session import AsyncSession");
    } else {
        src.line(
            "from sqlalchemy.ext.asyncio import AsyncSession, async_sessionmaker, create_async_engine",
        )
        .line("from sqlalchemy.orm import DeclarativeBase");
    }
    src.blank().from(ctx.import(ids::CONFIG)?, "settings");

    src.block(
        r#"

engine = create_async_engine(settings.DATABASE_URL, echo=settings.DEBUG, pool_pre_ping=True)
SessionLocal = async_sessionmaker(engine, class_=AsyncSession, expire_on_commit=False)
"#,
    );
    let metadata = if sqlmodel {
        "SQLModel.metadata"
    } else {
        src.block(
            r#"


class Base(DeclarativeBase):
    """Declarative base shared by every ORM model."""
"#,
        );
        "Base.metadata"
    };

    src.block(
        r#"


async def get_db() -> AsyncGenerator[AsyncSession, None]:
    async with SessionLocal() as session:
        yield session


async def init_db() -> None:
"#,
    );
    if config.migration_tool() == MigrationTool::None {
        if ctx.has(ids::MODELS_PACKAGE) {
            src.line("    # Register models on the metadata before creating tables.")
                .line(format!(
                    "    from {} import User  # noqa: F401",
                    ctx.import(ids::MODELS_PACKAGE)?
                ))
                .blank();
        }
        src.line("    async with engine.begin() as conn:")
            .line(format!("        await conn.run_sync({metadata}.create_all)"));
    } else {
        src.line("    # The schema is managed by migrations; only check connectivity.")
            .line("    async with engine.connect() as conn:")
            .line(r#"        await conn.execute(text("SELECT 1"))"#);
    }

    src.block(
        r#"


async def close_db() -> None:
    await engine.dispose()


async def check_database() -> bool:
    try:
        async with engine.connect() as conn:
            await conn.execute(text("SELECT 1"))
    except Exception:
        return False
    return True
"#,
    );
    Ok(src.finish())
}

fn tortoise_database(ctx: &RenderContext<'_>) -> Rendered {
    let config = ctx.config();
    let mut src = Source::new();

    src.line("from tortoise import Tortoise, connections")
        .blank()
        .from(ctx.import(ids::CONFIG)?, "settings");

    let mut models = Vec::new();
    if ctx.has(ids::USER_MODEL) {
        models.push(format!("\"{}\"", ctx.module_path(ids::USER_MODEL)?));
    }
    if config.migration_tool() == MigrationTool::Aerich {
        models.push("\"aerich.models\"".to_string());
    }

    src.block(
        r#"

TORTOISE_ORM = {
    "connections": {"default": settings.DATABASE_URL},
    "apps": {
        "models": {
"#,
    )
    .line(format!("            \"models\": [{}],", models.join(", ")))
    .block(
        r#"
            "default_connection": "default",
        },
    },
}


async def init_db() -> None:
    await Tortoise.init(config=TORTOISE_ORM)
"#,
    );
    if config.migration_tool() == MigrationTool::None {
        src.line("    await Tortoise.generate_schemas(safe=True)");
    }

    src.block(
        r#"


async def close_db() -> None:
    await connections.close_all()


async def check_database() -> bool:
    try:
        await connections.get("default").execute_query("SELECT 1")
    except Exception:
        return False
    return True
"#,
    );
    Ok(src.finish())
}
