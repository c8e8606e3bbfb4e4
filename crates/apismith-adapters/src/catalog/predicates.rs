//! Inclusion and dependency guards over configuration fields.
//!
//! Plain `fn` items so the registry stays a `'static` table.

use apismith_core::domain::{MigrationTool, Orm, ProjectConfig, TaskQueue};

pub fn db(c: &ProjectConfig) -> bool {
    c.has_database()
}

pub fn sql(c: &ProjectConfig) -> bool {
    c.has_sql_session()
}

/// The example user domain.
pub fn examples(c: &ProjectConfig) -> bool {
    c.has_user_examples()
}

pub fn include_examples(c: &ProjectConfig) -> bool {
    c.include_examples()
}

pub fn auth(c: &ProjectConfig) -> bool {
    c.has_auth()
}

pub fn cache(c: &ProjectConfig) -> bool {
    c.has_cache()
}

pub fn tasks(c: &ProjectConfig) -> bool {
    c.has_tasks()
}

pub fn example_tasks(c: &ProjectConfig) -> bool {
    c.has_tasks() && c.include_examples()
}

pub fn admin(c: &ProjectConfig) -> bool {
    c.admin_panel()
}

pub fn sql_or_auth(c: &ProjectConfig) -> bool {
    sql(c) || auth(c)
}

pub fn auth_with_examples(c: &ProjectConfig) -> bool {
    auth(c) && examples(c)
}

/// Example models whose tables are created at startup instead of by a
/// migration tool.
pub fn unmanaged_models(c: &ProjectConfig) -> bool {
    examples(c) && sql(c) && c.migration_tool() == MigrationTool::None
}

pub fn tortoise_examples(c: &ProjectConfig) -> bool {
    examples(c) && c.orm() == Orm::Tortoise
}

/// Plain SQLAlchemy, i.e. models derive from the declarative `Base`.
pub fn declarative_base(c: &ProjectConfig) -> bool {
    c.orm() == Orm::SqlAlchemy
}

pub fn alembic(c: &ProjectConfig) -> bool {
    c.migration_tool() == MigrationTool::Alembic
}

pub fn aerich(c: &ProjectConfig) -> bool {
    c.migration_tool() == MigrationTool::Aerich
}

pub fn migrations(c: &ProjectConfig) -> bool {
    c.migration_tool() != MigrationTool::None
}

pub fn arq(c: &ProjectConfig) -> bool {
    c.task_queue() == TaskQueue::Arq
}

pub fn dramatiq(c: &ProjectConfig) -> bool {
    c.task_queue() == TaskQueue::Dramatiq
}

pub fn celery_or_arq(c: &ProjectConfig) -> bool {
    matches!(c.task_queue(), TaskQueue::Celery | TaskQueue::Arq)
}

pub fn celery_or_dramatiq(c: &ProjectConfig) -> bool {
    matches!(c.task_queue(), TaskQueue::Celery | TaskQueue::Dramatiq)
}

pub fn docker(c: &ProjectConfig) -> bool {
    c.docker()
}

pub fn github_actions(c: &ProjectConfig) -> bool {
    c.github_actions()
}

pub fn pre_commit(c: &ProjectConfig) -> bool {
    c.pre_commit()
}
