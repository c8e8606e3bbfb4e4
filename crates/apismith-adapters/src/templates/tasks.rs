//! Background work: queue worker, jobs and the example task routes.

use apismith_core::domain::{Broker, RenderContext, TaskQueue};

use super::{Rendered, Source};
use crate::catalog::ids;

pub(crate) fn worker(ctx: &RenderContext<'_>) -> Rendered {
    let config = ctx.config();
    let mut src = Source::new();

    match config.task_queue() {
        TaskQueue::Celery => {
            src.line("from celery import Celery").blank();
            src.from(ctx.import(ids::CONFIG)?, "settings");
            src.blank()
                .line("celery_app = Celery(")
                .line(r#"    "{{PROJECT_NAME_SNAKE}}","#)
                .line("    broker=settings.BROKER_URL,")
                .line("    backend=settings.RESULT_BACKEND,")
                .line(format!("    include=[\"{}\"],", ctx.module_path(ids::JOBS)?))
                .line(")")
                .block(
                    r#"
celery_app.conf.update(
    task_serializer="json",
    result_serializer="json",
    accept_content=["json"],
    task_acks_late=True,
    worker_prefetch_multiplier=1,
    timezone="UTC",
)
"#,
                );
        }
        TaskQueue::Arq => {
            src.line("from arq.connections import RedisSettings").blank();
            src.from(ctx.import(ids::CONFIG)?, "settings");
            src.from(ctx.import(ids::JOBS)?, "send_welcome_email");
            src.block(
                r#"

redis_settings = RedisSettings.from_dsn(settings.BROKER_URL)


class WorkerSettings:
    functions = [send_welcome_email]
    redis_settings = redis_settings
    max_jobs = 10
    job_timeout = 300
"#,
            );
        }
        TaskQueue::Dramatiq | TaskQueue::None => {
            src.line("import dramatiq");
            match config.broker() {
                Broker::RabbitMq => {
                    src.line("from dramatiq.brokers.rabbitmq import RabbitmqBroker")
                        .blank()
                        .from(ctx.import(ids::CONFIG)?, "settings")
                        .blank()
                        .line("broker = RabbitmqBroker(url=settings.BROKER_URL)");
                }
                _ => {
                    src.line("from dramatiq.brokers.redis import RedisBroker")
                        .blank()
                        .from(ctx.import(ids::CONFIG)?, "settings")
                        .blank()
                        .line("broker = RedisBroker(url=settings.BROKER_URL)");
                }
            }
            src.line("dramatiq.set_broker(broker)");
        }
    }
    Ok(src.finish())
}

pub(crate) fn jobs(ctx: &RenderContext<'_>) -> Rendered {
    let mut src = Source::new();

    match ctx.config().task_queue() {
        TaskQueue::Celery => {
            src.line("import time").blank();
            src.from(ctx.import(ids::WORKER)?, "celery_app");
            src.block(
                r#"


@celery_app.task(name="send_welcome_email", bind=True, max_retries=3)
def send_welcome_email(self, email: str) -> str:  # noqa: ANN001
    time.sleep(1)
    return f"Welcome email sent to {email}"
"#,
            );
        }
        TaskQueue::Arq => {
            src.block(
                r#"
import asyncio
from typing import Any


async def send_welcome_email(ctx: dict[str, Any], email: str) -> str:
    await asyncio.sleep(1)
    return f"Welcome email sent to {email}"
"#,
            );
        }
        TaskQueue::Dramatiq | TaskQueue::None => {
            src.line("import time").blank().line("import dramatiq").blank();
            // Importing the worker installs the broker before actors are declared.
            src.from(ctx.import(ids::WORKER)?, "broker  # noqa: F401");
            src.block(
                r#"


@dramatiq.actor(max_retries=3)
def send_welcome_email(email: str) -> None:
    time.sleep(1)
    print(f"Welcome email sent to {email}")
"#,
            );
        }
    }
    Ok(src.finish())
}

pub(crate) fn routes(ctx: &RenderContext<'_>) -> Rendered {
    let queue = ctx.config().task_queue();
    let mut src = Source::new();

    match queue {
        TaskQueue::Celery => {
            src.line("from celery.result import AsyncResult");
        }
        TaskQueue::Arq => {
            src.line("from arq import create_pool");
        }
        TaskQueue::Dramatiq | TaskQueue::None => {}
    }
    src.line("from fastapi import APIRouter, status")
        .line("from pydantic import BaseModel, EmailStr")
        .blank();
    match queue {
        TaskQueue::Arq => src.from(ctx.import(ids::WORKER)?, "redis_settings"),
        _ => src.from(ctx.import(ids::JOBS)?, "send_welcome_email"),
    };

    src.block(
        r#"

router = APIRouter()


class WelcomeEmailRequest(BaseModel):
    email: EmailStr


class TaskAccepted(BaseModel):
    task_id: str


@router.post("/welcome-email", response_model=TaskAccepted, status_code=status.HTTP_202_ACCEPTED)
async def enqueue_welcome_email(payload: WelcomeEmailRequest) -> TaskAccepted:
"#,
    );

    match queue {
        TaskQueue::Celery => {
            src.block(
                r#"
    result = send_welcome_email.delay(payload.email)
    return TaskAccepted(task_id=result.id)


@router.get("/{task_id}")
async def task_status(task_id: str) -> dict[str, object]:
    result = AsyncResult(task_id, app=send_welcome_email.app)
    return {
        "task_id": task_id,
        "status": result.status,
        "result": result.result if result.ready() else None,
    }
"#,
            );
        }
        TaskQueue::Arq => {
            src.block(
                r#"
    pool = await create_pool(redis_settings)
    try:
        job = await pool.enqueue_job("send_welcome_email", payload.email)
    finally:
        await pool.aclose()
    return TaskAccepted(task_id=job.job_id if job is not None else "")
"#,
            );
        }
        TaskQueue::Dramatiq | TaskQueue::None => {
            src.block(
                r#"
    message = send_welcome_email.send(payload.email)
    return TaskAccepted(task_id=message.message_id)
"#,
            );
        }
    }
    Ok(src.finish())
}
