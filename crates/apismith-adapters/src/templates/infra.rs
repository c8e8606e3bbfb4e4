//! Cross-cutting modules: logging, exceptions, security and cache.

use apismith_core::domain::{AuthMethod, CacheBackend, LoggingLibrary, RenderContext};

use super::{Rendered, Source};
use crate::catalog::ids;

pub(crate) fn logging(ctx: &RenderContext<'_>) -> Rendered {
    let config = ctx.import(ids::CONFIG)?;
    let mut src = Source::new();

    match ctx.config().logging() {
        LoggingLibrary::Standard => {
            src.line("import logging").line("import sys").blank();
            src.from(config, "settings");
            src.block(
                r#"

LOG_FORMAT = "%(asctime)s %(levelname)-8s %(name)s: %(message)s"


def setup_logging() -> None:
    logging.basicConfig(
        level=settings.LOG_LEVEL,
        format=LOG_FORMAT,
        stream=sys.stdout,
        force=True,
    )
    logging.getLogger("uvicorn.access").setLevel(logging.WARNING)


def get_logger(name: str) -> logging.Logger:
    return logging.getLogger(name)
"#,
            );
        }
        LoggingLibrary::Loguru => {
            src.line("import logging").line("import sys").blank();
            src.line("from loguru import logger").blank();
            src.from(config, "settings");
            src.block(
                r#"


class InterceptHandler(logging.Handler):
    """Route records from the standard library into loguru."""

    def emit(self, record: logging.LogRecord) -> None:
        try:
            level: str | int = logger.level(record.levelname).name
        except ValueError:
            level = record.levelno
        logger.opt(depth=6, exception=record.exc_info).log(level, record.getMessage())


def setup_logging() -> None:
    logger.remove()
    logger.add(sys.stdout, level=settings.LOG_LEVEL, enqueue=True, backtrace=settings.DEBUG)
    logging.basicConfig(handlers=[InterceptHandler()], level=0, force=True)
    for name in ("uvicorn", "uvicorn.error", "uvicorn.access"):
        logging.getLogger(name).handlers = [InterceptHandler()]


def get_logger(name: str):  # noqa: ANN201
    return logger.bind(name=name)
"#,
            );
        }
        LoggingLibrary::Structlog => {
            src.line("import logging").line("import sys").blank();
            src.line("import structlog").blank();
            src.from(config, "settings");
            src.block(
                r#"


def setup_logging() -> None:
    logging.basicConfig(format="%(message)s", stream=sys.stdout, level=settings.LOG_LEVEL, force=True)
    renderer = (
        structlog.dev.ConsoleRenderer() if settings.DEBUG else structlog.processors.JSONRenderer()
    )
    structlog.configure(
        processors=[
            structlog.contextvars.merge_contextvars,
            structlog.stdlib.add_log_level,
            structlog.stdlib.add_logger_name,
            structlog.processors.TimeStamper(fmt="iso"),
            structlog.processors.StackInfoRenderer(),
            structlog.processors.format_exc_info,
            renderer,
        ],
        logger_factory=structlog.stdlib.LoggerFactory(),
        wrapper_class=structlog.stdlib.BoundLogger,
        cache_logger_on_first_use=True,
    )


def get_logger(name: str) -> structlog.stdlib.BoundLogger:
    return structlog.get_logger(name)
"#,
            );
        }
    }
    Ok(src.finish())
}

pub(crate) fn exceptions(_: &RenderContext<'_>) -> Rendered {
    Ok(Source::new()
        .block(
            r#"
from fastapi import FastAPI, Request, status
from fastapi.responses import JSONResponse


class AppError(Exception):
    """Base class for errors that map to an HTTP response."""

    status_code: int = status.HTTP_400_BAD_REQUEST

    def __init__(self, detail: str) -> None:
        super().__init__(detail)
        self.detail = detail


class NotFoundError(AppError):
    status_code = status.HTTP_404_NOT_FOUND


class ConflictError(AppError):
    status_code = status.HTTP_409_CONFLICT


class AuthenticationError(AppError):
    status_code = status.HTTP_401_UNAUTHORIZED


def register_exception_handlers(app: FastAPI) -> None:
    @app.exception_handler(AppError)
    async def handle_app_error(_: Request, exc: AppError) -> JSONResponse:
        return JSONResponse(status_code=exc.status_code, content={"detail": exc.detail})
"#,
        )
        .finish())
}

pub(crate) fn security(ctx: &RenderContext<'_>) -> Rendered {
    let method = ctx.config().auth_method();
    let mut src = Source::new();

    match method {
        AuthMethod::Session => {
            src.line("from typing import Any")
                .blank()
                .line("from itsdangerous import BadSignature, SignatureExpired, URLSafeTimedSerializer")
                .line("from passlib.context import CryptContext");
        }
        _ => {
            src.line("from datetime import datetime, timedelta, timezone")
                .line("from typing import Any")
                .blank()
                .line("import jwt")
                .line("from fastapi.security import OAuth2PasswordBearer")
                .line("from passlib.context import CryptContext");
        }
    }
    src.blank().from(ctx.import(ids::CONFIG)?, "settings");

    src.block(
        r#"

SECRET_KEY = settings.SECRET_KEY
pwd_context = CryptContext(schemes=["bcrypt"], deprecated="auto")
"#,
    );

    match method {
        AuthMethod::Session => {
            src.line(r#"serializer = URLSafeTimedSerializer(SECRET_KEY, salt="session")"#)
                .line("SESSION_COOKIE_NAME = settings.SESSION_COOKIE_NAME");
        }
        AuthMethod::OAuth2 => {
            src.block(
                r#"
oauth2_scheme = OAuth2PasswordBearer(
    tokenUrl=f"{settings.API_V1_PREFIX}/auth/token",
    scopes={"me": "Read the current user", "users": "Manage users"},
)
"#,
            );
        }
        _ => {
            src.line(
                r#"oauth2_scheme = OAuth2PasswordBearer(tokenUrl=f"{settings.API_V1_PREFIX}/auth/token")"#,
            );
        }
    }

    src.block(
        r#"


def verify_password(plain_password: str, hashed_password: str) -> bool:
    return pwd_context.verify(plain_password, hashed_password)


def get_password_hash(password: str) -> str:
    return pwd_context.hash(password)
"#,
    );

    match method {
        AuthMethod::Session => {
            src.block(
                r#"


def create_session_token(subject: str) -> str:
    return serializer.dumps({"sub": subject})


def read_session_token(token: str) -> dict[str, Any] | None:
    try:
        return serializer.loads(token, max_age=settings.SESSION_MAX_AGE_SECONDS)
    except (BadSignature, SignatureExpired):
        return None
"#,
            );
        }
        _ => {
            src.block(
                r#"


def create_access_token(
    subject: str,
    expires_delta: timedelta | None = None,
    scopes: list[str] | None = None,
) -> str:
    expire = datetime.now(timezone.utc) + (
        expires_delta or timedelta(minutes=settings.ACCESS_TOKEN_EXPIRE_MINUTES)
    )
    claims: dict[str, Any] = {"sub": subject, "exp": expire, "scopes": scopes or []}
    return jwt.encode(claims, settings.SECRET_KEY, algorithm=settings.ALGORITHM)


def decode_access_token(token: str) -> dict[str, Any] | None:
    try:
        return jwt.decode(token, settings.SECRET_KEY, algorithms=[settings.ALGORITHM])
    except jwt.PyJWTError:
        return None
"#,
            );
        }
    }
    Ok(src.finish())
}

pub(crate) fn cache(ctx: &RenderContext<'_>) -> Rendered {
    let config = ctx.import(ids::CONFIG)?;
    let mut src = Source::new();

    match ctx.config().cache_backend() {
        CacheBackend::Redis => {
            src.line("import json").line("from typing import Any").blank();
            src.line("from redis.asyncio import Redis").blank();
            src.from(config, "settings");
            src.block(
                r#"

_client: Redis | None = None


async def init_cache() -> None:
    global _client
    _client = Redis.from_url(settings.CACHE_URL, decode_responses=True)


async def close_cache() -> None:
    global _client
    if _client is not None:
        await _client.aclose()
        _client = None


def _require() -> Redis:
    if _client is None:
        raise RuntimeError("cache is not initialised")
    return _client


async def cache_get(key: str) -> Any | None:
    raw = await _require().get(key)
    return None if raw is None else json.loads(raw)


async def cache_set(key: str, value: Any, ttl: int | None = None) -> None:
    await _require().set(key, json.dumps(value), ex=ttl or settings.CACHE_TTL_SECONDS)


async def cache_delete(key: str) -> None:
    await _require().delete(key)


async def ping() -> bool:
    try:
        return bool(await _require().ping())
    except Exception:
        return False
"#,
            );
        }
        CacheBackend::Memcached => {
            src.line("import json").line("from typing import Any").blank();
            src.line("import aiomcache").blank();
            src.from(config, "settings");
            src.block(
                r#"

_client: aiomcache.Client | None = None


async def init_cache() -> None:
    global _client
    host, _, port = settings.CACHE_URL.rpartition(":")
    _client = aiomcache.Client(host or "localhost", int(port or 11211))


async def close_cache() -> None:
    global _client
    if _client is not None:
        await _client.close()
        _client = None


def _require() -> aiomcache.Client:
    if _client is None:
        raise RuntimeError("cache is not initialised")
    return _client


async def cache_get(key: str) -> Any | None:
    raw = await _require().get(key.encode())
    return None if raw is None else json.loads(raw)


async def cache_set(key: str, value: Any, ttl: int | None = None) -> None:
    payload = json.dumps(value).encode()
    await _require().set(key.encode(), payload, exptime=ttl or settings.CACHE_TTL_SECONDS)


async def cache_delete(key: str) -> None:
    await _require().delete(key.encode())


async def ping() -> bool:
    try:
        await _require().version()
    except Exception:
        return False
    return True
"#,
            );
        }
        CacheBackend::InMemory | CacheBackend::None => {
            src.line("from typing import Any").blank();
            src.line("from cachetools import TTLCache").blank();
            src.from(config, "settings");
            src.block(
                r#"

_store: TTLCache[str, Any] = TTLCache(maxsize=1024, ttl=settings.CACHE_TTL_SECONDS)


async def init_cache() -> None:
    _store.clear()


async def close_cache() -> None:
    _store.clear()


async def cache_get(key: str) -> Any | None:
    return _store.get(key)


async def cache_set(key: str, value: Any, ttl: int | None = None) -> None:
    # TTLCache applies one expiry to every entry; `ttl` is accepted for API parity.
    _store[key] = value


async def cache_delete(key: str) -> None:
    _store.pop(key, None)


async def ping() -> bool:
    return True
"#,
            );
        }
    }
    Ok(src.finish())
}
