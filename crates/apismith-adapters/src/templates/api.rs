//! HTTP surface: dependencies, router, health and authentication routes.

use apismith_core::domain::{AuthMethod, Orm, RenderContext};

use super::{Rendered, Source};
use crate::catalog::ids;

/// `AsyncSession` import for the configured SQL ORM.
pub(crate) fn session_import(orm: Orm) -> &'static str {
    match orm {
        Orm::SqlModel => "from sqlmodel.ext.asyncio.session import AsyncSession",
        _ => "from sqlalchemy.ext.asyncio import AsyncSession",
    }
}

pub(crate) fn deps(ctx: &RenderContext<'_>) -> Rendered {
    let config = ctx.config();
    let sql = ctx.has(ids::DATABASE);
    let auth = ctx.has(ids::SECURITY);
    let load_user = ctx.has(ids::USER_REPOSITORY);
    let session_auth = config.auth_method() == AuthMethod::Session;
    let mut src = Source::new();

    src.line("from typing import Annotated").blank();
    match (auth, session_auth) {
        (true, true) => src.line("from fastapi import Depends, HTTPException, Request, status"),
        (true, false) => src.line("from fastapi import Depends, HTTPException, status"),
        _ => src.line("from fastapi import Depends"),
    };
    if sql {
        src.line(session_import(config.orm()));
    }
    src.blank();

    if sql {
        src.from(ctx.import(ids::DATABASE)?, "get_db");
    }
    if auth {
        let names = if session_auth {
            "SESSION_COOKIE_NAME, read_session_token"
        } else {
            "decode_access_token, oauth2_scheme"
        };
        src.from(ctx.import(ids::SECURITY)?, names);
    }
    if load_user {
        src.from(ctx.import(ids::USER_MODEL)?, "User");
        src.from(ctx.import(ids::USER_REPOSITORY)?, "UserRepository");
    }

    if sql {
        src.blank()
            .line("DbSession = Annotated[AsyncSession, Depends(get_db)]");
    }

    if !auth {
        return Ok(src.finish());
    }

    src.block(
        r#"

credentials_error = HTTPException(
    status_code=status.HTTP_401_UNAUTHORIZED,
    detail="Could not validate credentials",
    headers={"WWW-Authenticate": "Bearer"},
)

"#,
    );

    let mut params = Vec::new();
    if session_auth {
        params.push("request: Request");
    } else {
        params.push("token: Annotated[str, Depends(oauth2_scheme)]");
    }
    if load_user && sql {
        params.push("db: DbSession");
    }
    let returns = if load_user { "User" } else { "str" };

    src.blank().line(format!(
        "async def get_current_user({}) -> {returns}:",
        params.join(", ")
    ));
    if session_auth {
        src.line("    token = request.cookies.get(SESSION_COOKIE_NAME)")
            .line("    payload = read_session_token(token) if token else None");
    } else {
        src.line("    payload = decode_access_token(token)");
    }
    src.line(r#"    if payload is None or "sub" not in payload:"#)
        .line("        raise credentials_error");

    if load_user {
        let repository = if sql {
            "UserRepository(db)"
        } else {
            "UserRepository()"
        };
        src.line(format!(
            "    user = await {repository}.get_by_email(payload[\"sub\"])"
        ))
        .line("    if user is None or not user.is_active:")
        .line("        raise credentials_error")
        .line("    return user");
    } else {
        src.line(r#"    return str(payload["sub"])"#);
    }

    src.blank()
        .blank()
        .line(format!(
            "CurrentUser = Annotated[{returns}, Depends(get_current_user)]"
        ));
    Ok(src.finish())
}

pub(crate) fn router(ctx: &RenderContext<'_>) -> Rendered {
    let mut src = Source::new();
    src.line("from fastapi import APIRouter").blank();

    // (module, alias, prefix, tag)
    let mounts = [
        (ids::HEALTH_ROUTES, "health_router", None, "health"),
        (ids::AUTH_ROUTES, "auth_router", Some("/auth"), "auth"),
        (ids::USER_ROUTES, "users_router", Some("/users"), "users"),
        (ids::TASK_ROUTES, "tasks_router", Some("/tasks"), "tasks"),
    ];
    let active: Vec<_> = mounts.iter().filter(|(id, ..)| ctx.has(*id)).collect();

    for (id, alias, ..) in &active {
        src.from(ctx.import(*id)?, &format!("router as {alias}"));
    }
    src.blank().blank().line("api_router = APIRouter()");
    for (_, alias, prefix, tag) in &active {
        match prefix {
            Some(prefix) => src.line(format!(
                "api_router.include_router({alias}, prefix=\"{prefix}\", tags=[\"{tag}\"])"
            )),
            None => src.line(format!("api_router.include_router({alias}, tags=[\"{tag}\"])")),
        };
    }
    Ok(src.finish())
}

pub(crate) fn health(ctx: &RenderContext<'_>) -> Rendered {
    let mut src = Source::new();
    src.line("from fastapi import APIRouter").blank();
    if ctx.has(ids::CACHE) {
        src.from(ctx.import(ids::CACHE)?, "ping");
    }
    src.from(ctx.import(ids::CONFIG)?, "settings");
    if ctx.has(ids::DATABASE) {
        src.from(ctx.import(ids::DATABASE)?, "check_database");
    }

    src.block(
        r#"

router = APIRouter()


@router.get("/health")
async def health() -> dict[str, object]:
    checks: dict[str, bool] = {}
"#,
    );
    if ctx.has(ids::DATABASE) {
        src.line(r#"    checks["database"] = await check_database()"#);
    }
    if ctx.has(ids::CACHE) {
        src.line(r#"    checks["cache"] = await ping()"#);
    }
    src.block(
        r#"
    status = "ok" if all(checks.values()) else "degraded"
    return {"status": status, "version": settings.VERSION, "checks": checks}
"#,
    );
    Ok(src.finish())
}

pub(crate) fn auth_schemas(_: &RenderContext<'_>) -> Rendered {
    Ok(Source::new()
        .block(
            r#"
from pydantic import BaseModel, Field


class Token(BaseModel):
    access_token: str
    token_type: str = "bearer"


class TokenPayload(BaseModel):
    sub: str
    scopes: list[str] = Field(default_factory=list)


class LoginRequest(BaseModel):
    username: str
    password: str
"#,
        )
        .finish())
}

pub(crate) fn auth_routes(ctx: &RenderContext<'_>) -> Rendered {
    let config = ctx.config();
    let session_auth = config.auth_method() == AuthMethod::Session;
    let users = ctx.has(ids::USER_SERVICE);
    let sql = config.has_sql_session();
    let mut src = Source::new();

    let reject = if users { "" } else { "HTTPException, " };
    if session_auth {
        src.line(format!("from fastapi import APIRouter, {reject}Response, status"));
    } else {
        src.line("from datetime import timedelta")
            .line("from typing import Annotated")
            .blank()
            .line(format!("from fastapi import APIRouter, Depends, {reject}status"))
            .line("from fastapi.security import OAuth2PasswordRequestForm");
    }
    src.blank();

    let deps = if users && sql {
        "CurrentUser, DbSession"
    } else {
        "CurrentUser"
    };
    src.from(ctx.import(ids::DEPS)?, deps);
    src.from(ctx.import(ids::CONFIG)?, "settings");
    if session_auth {
        src.from(ctx.import(ids::SECURITY)?, "create_session_token");
        src.from(ctx.import(ids::AUTH_SCHEMAS)?, "LoginRequest");
    } else {
        src.from(ctx.import(ids::SECURITY)?, "create_access_token");
        src.from(ctx.import(ids::AUTH_SCHEMAS)?, "Token");
    }
    if users {
        src.from(ctx.import(ids::USER_SCHEMAS)?, "UserCreate, UserRead");
        src.from(ctx.import(ids::USER_SERVICE)?, "UserService");
    }

    src.blank().blank().line("router = APIRouter()").blank();

    let db_param = if users && sql { ", db: DbSession" } else { "" };
    let service = if sql { "UserService(db)" } else { "UserService()" };

    // Resolve the login subject, either from the example user table or
    // from the demo credentials in settings.
    let (username, password) = if session_auth {
        ("payload.username", "payload.password")
    } else {
        ("form_data.username", "form_data.password")
    };
    let mut subject = Source::new();
    if users {
        subject
            .line(format!(
                "    user = await {service}.authenticate({username}, {password})"
            ))
            .line("    subject = user.email");
    } else {
        subject
            .line(format!(
                "    if {username} != settings.DEMO_USERNAME or {password} != settings.DEMO_PASSWORD:"
            ))
            .line("        raise HTTPException(")
            .line("            status_code=status.HTTP_401_UNAUTHORIZED,")
            .line(r#"            detail="Incorrect username or password","#)
            .line("        )")
            .line(format!("    subject = {username}"));
    }
    let subject = subject.finish();

    if session_auth {
        src.blank()
            .line(r#"@router.post("/login", status_code=status.HTTP_204_NO_CONTENT)"#)
            .line(format!(
                "async def login(payload: LoginRequest, response: Response{db_param}) -> None:"
            ))
            .block(&subject)
            .block(
                r#"
    response.set_cookie(
        settings.SESSION_COOKIE_NAME,
        create_session_token(subject),
        max_age=settings.SESSION_MAX_AGE_SECONDS,
        httponly=True,
        samesite="lax",
    )


@router.post("/logout", status_code=status.HTTP_204_NO_CONTENT)
async def logout(response: Response) -> None:
    response.delete_cookie(settings.SESSION_COOKIE_NAME)
"#,
            );
    } else {
        src.blank()
            .line(r#"@router.post("/token", response_model=Token)"#)
            .line("async def login(")
            .line(format!(
                "    form_data: Annotated[OAuth2PasswordRequestForm, Depends()]{db_param},"
            ))
            .line(") -> Token:")
            .block(&subject)
            .block(
                r#"
    expires = timedelta(minutes=settings.ACCESS_TOKEN_EXPIRE_MINUTES)
    token = create_access_token(subject, expires_delta=expires, scopes=form_data.scopes)
    return Token(access_token=token)
"#,
            );
    }

    if users {
        src.blank()
            .blank()
            .line(
                r#"@router.post("/register", response_model=UserRead, status_code=status.HTTP_201_CREATED)"#,
            )
            .line(format!(
                "async def register(payload: UserCreate{db_param}) -> UserRead:"
            ))
            .line(format!("    user = await {service}.create(payload)"))
            .line("    return UserRead.model_validate(user)")
            .blank()
            .blank()
            .line(r#"@router.get("/me", response_model=UserRead)"#)
            .line("async def me(current_user: CurrentUser) -> UserRead:")
            .line("    return UserRead.model_validate(current_user)");
    } else {
        src.blank()
            .blank()
            .line(r#"@router.get("/me")"#)
            .line("async def me(current_user: CurrentUser) -> dict[str, str]:")
            .line(r#"    return {"username": current_user}"#);
    }
    Ok(src.finish())
}
