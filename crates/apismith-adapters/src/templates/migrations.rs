//! Alembic environment and the prestart script.

use apismith_core::domain::{MigrationTool, Orm, RenderContext};

use super::{Rendered, Source};
use crate::catalog::ids;

pub(crate) fn env(ctx: &RenderContext<'_>) -> Rendered {
    let sqlmodel = ctx.config().orm() == Orm::SqlModel;
    let mut src = Source::new();

    src.block(
        r#"
import asyncio
from logging.config import fileConfig

from alembic import context
from sqlalchemy import pool
from sqlalchemy.engine import Connection
from sqlalchemy.ext.asyncio import async_engine_from_config
"#,
    );
    if sqlmodel {
        src.line("from sqlmodel import SQLModel");
    }
    src.blank().from(ctx.import(ids::CONFIG)?, "settings");
    if ctx.has(ids::DATABASE) {
        src.from(ctx.import(ids::DATABASE)?, "Base");
    }
    if ctx.has(ids::MODELS_PACKAGE) {
        src.from(ctx.import(ids::MODELS_PACKAGE)?, "User  # noqa: F401");
    }

    let metadata = if sqlmodel {
        "SQLModel.metadata"
    } else {
        "Base.metadata"
    };
    src.block(
        r#"

config = context.config
config.set_main_option("sqlalchemy.url", settings.DATABASE_URL.replace("%", "%%"))

if config.config_file_name is not None:
    fileConfig(config.config_file_name)

"#,
    )
    .line(format!("target_metadata = {metadata}"))
    .block(
        r#"


def run_migrations_offline() -> None:
    context.configure(
        url=settings.DATABASE_URL,
        target_metadata=target_metadata,
        literal_binds=True,
        dialect_opts={"paramstyle": "named"},
    )
    with context.begin_transaction():
        context.run_migrations()


def do_run_migrations(connection: Connection) -> None:
    context.configure(connection=connection, target_metadata=target_metadata)
    with context.begin_transaction():
        context.run_migrations()


async def run_async_migrations() -> None:
    connectable = async_engine_from_config(
        config.get_section(config.config_ini_section, {}),
        prefix="sqlalchemy.",
        poolclass=pool.NullPool,
    )
    async with connectable.connect() as connection:
        await connection.run_sync(do_run_migrations)
    await connectable.dispose()


def run_migrations_online() -> None:
    asyncio.run(run_async_migrations())


if context.is_offline_mode():
    run_migrations_offline()
else:
    run_migrations_online()
"#,
    );
    Ok(src.finish())
}

pub(crate) fn script(ctx: &RenderContext<'_>) -> Rendered {
    let mut src = Source::new();
    src.block(
        r#"
"""${message}

Revision ID: ${up_revision}
Revises: ${down_revision | comma,n}
Create Date: ${create_date}
"""
from collections.abc import Sequence

from alembic import op
import sqlalchemy as sa
"#,
    );
    if ctx.config().orm() == Orm::SqlModel {
        src.line("import sqlmodel");
    }
    src.block(
        r#"
${imports if imports else ""}

revision: str = ${repr(up_revision)}
down_revision: str | None = ${repr(down_revision)}
branch_labels: str | Sequence[str] | None = ${repr(branch_labels)}
depends_on: str | Sequence[str] | None = ${repr(depends_on)}


def upgrade() -> None:
    ${upgrades if upgrades else "pass"}


def downgrade() -> None:
    ${downgrades if downgrades else "pass"}
"#,
    );
    Ok(src.finish())
}

pub(crate) fn ini(_: &RenderContext<'_>) -> Rendered {
    Ok(Source::new()
        .block(
            r#"
[alembic]
script_location = migrations
prepend_sys_path = .
file_template = %%(year)d%%(month).2d%%(day).2d_%%(rev)s_%%(slug)s
# The connection URL is read from the application settings.
sqlalchemy.url =

[loggers]
keys = root,sqlalchemy,alembic

[handlers]
keys = console

[formatters]
keys = generic

[logger_root]
level = WARN
handlers = console
qualname =

[logger_sqlalchemy]
level = WARN
handlers =
qualname = sqlalchemy.engine

[logger_alembic]
level = INFO
handlers =
qualname = alembic

[handler_console]
class = StreamHandler
args = (sys.stderr,)
level = NOTSET
formatter = generic

[formatter_generic]
format = %(levelname)-5.5s [%(name)s] %(message)s
datefmt = %H:%M:%S
"#,
        )
        .finish())
}

/// Keeps the empty versions directory under version control.
pub(crate) fn versions_keep(_: &RenderContext<'_>) -> Rendered {
    Ok(String::new())
}

pub(crate) fn prestart(ctx: &RenderContext<'_>) -> Rendered {
    let upgrade = match ctx.config().migration_tool() {
        MigrationTool::Aerich => "aerich upgrade",
        _ => "alembic upgrade head",
    };
    Ok(Source::new()
        .line("#!/usr/bin/env bash")
        .line("set -euo pipefail")
        .blank()
        .line(r#"cd "$(dirname "$0")/..""#)
        .blank()
        .line(r#"echo "Applying database migrations""#)
        .line(upgrade)
        .finish())
}
