//! Example user domain: model, schemas, repository, service and routes.

use apismith_core::domain::{Orm, RenderContext};

use super::api::session_import;
use super::{Rendered, Source};
use crate::catalog::ids;

pub(crate) fn model(ctx: &RenderContext<'_>) -> Rendered {
    let mut src = Source::new();

    match ctx.config().orm() {
        Orm::SqlModel => {
            src.block(
                r#"
from datetime import datetime, timezone

from sqlmodel import Field, SQLModel


def _now() -> datetime:
    return datetime.now(timezone.utc)


class User(SQLModel, table=True):
    __tablename__ = "users"

    id: int | None = Field(default=None, primary_key=True)
    email: str = Field(max_length=255, unique=True, index=True)
    full_name: str | None = Field(default=None, max_length=255)
    hashed_password: str = Field(max_length=255)
    is_active: bool = Field(default=True)
    created_at: datetime = Field(default_factory=_now)
"#,
            );
        }
        Orm::Tortoise => {
            src.block(
                r#"
from tortoise import fields
from tortoise.models import Model


class User(Model):
    id = fields.IntField(primary_key=True)
    email = fields.CharField(max_length=255, unique=True, db_index=True)
    full_name = fields.CharField(max_length=255, null=True)
    hashed_password = fields.CharField(max_length=255)
    is_active = fields.BooleanField(default=True)
    created_at = fields.DatetimeField(auto_now_add=True)

    class Meta:
        table = "users"

    def __str__(self) -> str:
        return self.email
"#,
            );
        }
        _ => {
            src.line("from datetime import datetime")
                .blank()
                .line("from sqlalchemy import Boolean, DateTime, String, func")
                .line("from sqlalchemy.orm import Mapped, mapped_column")
                .blank()
                .from(ctx.import(ids::DATABASE)?, "Base");
            src.block(
                r#"


class User(Base):
    __tablename__ = "users"

    id: Mapped[int] = mapped_column(primary_key=True)
    email: Mapped[str] = mapped_column(String(255), unique=True, index=True)
    full_name: Mapped[str | None] = mapped_column(String(255), nullable=True)
    hashed_password: Mapped[str] = mapped_column(String(255))
    is_active: Mapped[bool] = mapped_column(Boolean, default=True)
    created_at: Mapped[datetime] = mapped_column(
        DateTime(timezone=True), server_default=func.now()
    )

    def __repr__(self) -> str:
        return f"User(id={self.id!r}, email={self.email!r})"
"#,
            );
        }
    }
    Ok(src.finish())
}

/// Re-exports every model so a single import registers them on the metadata.
pub(crate) fn models_package(ctx: &RenderContext<'_>) -> Rendered {
    Ok(Source::new()
        .from(ctx.import(ids::USER_MODEL)?, "User")
        .blank()
        .line(r#"__all__ = ["User"]"#)
        .finish())
}

pub(crate) fn schemas(_: &RenderContext<'_>) -> Rendered {
    Ok(Source::new()
        .block(
            r#"
from datetime import datetime

from pydantic import BaseModel, ConfigDict, EmailStr, Field


class UserBase(BaseModel):
    email: EmailStr
    full_name: str | None = None


class UserCreate(UserBase):
    password: str = Field(min_length=8)


class UserUpdate(BaseModel):
    email: EmailStr | None = None
    full_name: str | None = None
    password: str | None = Field(default=None, min_length=8)
    is_active: bool | None = None


class UserRead(UserBase):
    model_config = ConfigDict(from_attributes=True)

    id: int
    is_active: bool
    created_at: datetime | None = None
"#,
        )
        .finish())
}

pub(crate) fn repository(ctx: &RenderContext<'_>) -> Rendered {
    let orm = ctx.config().orm();
    let mut src = Source::new();

    match orm {
        Orm::Tortoise => {}
        Orm::SqlModel => {
            src.line("from sqlmodel import select")
                .line(session_import(orm))
                .blank();
        }
        _ => {
            src.line("from sqlalchemy import select")
                .line(session_import(orm))
                .blank();
        }
    }
    src.from(ctx.import(ids::USER_MODEL)?, "User");
    src.from(ctx.import(ids::USER_SCHEMAS)?, "UserCreate, UserUpdate");

    if orm == Orm::Tortoise {
        src.block(
            r#"


class UserRepository:
    async def get(self, user_id: int) -> User | None:
        return await User.get_or_none(id=user_id)

    async def get_by_email(self, email: str) -> User | None:
        return await User.get_or_none(email=email)

    async def list_all(self, offset: int = 0, limit: int = 100) -> list[User]:
        return await User.all().offset(offset).limit(limit)

    async def create(self, data: UserCreate, hashed_password: str) -> User:
        return await User.create(
            email=data.email,
            full_name=data.full_name,
            hashed_password=hashed_password,
        )

    async def update(
        self, user: User, data: UserUpdate, hashed_password: str | None = None
    ) -> User:
        changes = data.model_dump(exclude_unset=True, exclude={"password"})
        if hashed_password is not None:
            changes["hashed_password"] = hashed_password
        user.update_from_dict(changes)
        await user.save()
        return user

    async def delete(self, user: User) -> None:
        await user.delete()
"#,
        );
        return Ok(src.finish());
    }

    let (execute, one, many) = if orm == Orm::SqlModel {
        ("exec", "result.first()", "list(result.all())")
    } else {
        (
            "execute",
            "result.scalar_one_or_none()",
            "list(result.scalars().all())",
        )
    };

    src.block(
        r#"


class UserRepository:
    def __init__(self, session: AsyncSession) -> None:
        self.session = session

    async def get(self, user_id: int) -> User | None:
        return await self.session.get(User, user_id)

"#,
    )
    .line("    async def get_by_email(self, email: str) -> User | None:")
    .line(format!(
        "        result = await self.session.{execute}(select(User).where(User.email == email))"
    ))
    .line(format!("        return {one}"))
    .blank()
    .line("    async def list_all(self, offset: int = 0, limit: int = 100) -> list[User]:")
    .line(format!(
        "        result = await self.session.{execute}(select(User).offset(offset).limit(limit))"
    ))
    .line(format!("        return {many}"))
    .block(
        r#"

    async def create(self, data: UserCreate, hashed_password: str) -> User:
        user = User(
            email=data.email,
            full_name=data.full_name,
            hashed_password=hashed_password,
        )
        return await self._save(user)

    async def update(
        self, user: User, data: UserUpdate, hashed_password: str | None = None
    ) -> User:
        for field, value in data.model_dump(exclude_unset=True, exclude={"password"}).items():
            setattr(user, field, value)
        if hashed_password is not None:
            user.hashed_password = hashed_password
        return await self._save(user)

    async def delete(self, user: User) -> None:
        await self.session.delete(user)
        await self.session.commit()

    async def _save(self, user: User) -> User:
        self.session.add(user)
        await self.session.commit()
        await self.session.refresh(user)
        return user
"#,
    );
    Ok(src.finish())
}

pub(crate) fn service(ctx: &RenderContext<'_>) -> Rendered {
    let orm = ctx.config().orm();
    let sql = orm != Orm::Tortoise;
    let auth = ctx.has(ids::SECURITY);
    let mut src = Source::new();

    if !auth {
        src.line("import hashlib").blank();
    }
    if sql {
        src.line(session_import(orm)).blank();
    }

    let errors = if auth {
        "AuthenticationError, ConflictError, NotFoundError"
    } else {
        "ConflictError, NotFoundError"
    };
    src.from(ctx.import(ids::EXCEPTIONS)?, errors);
    if auth {
        src.from(ctx.import(ids::SECURITY)?, "get_password_hash, verify_password");
    }
    src.from(ctx.import(ids::USER_MODEL)?, "User");
    src.from(ctx.import(ids::USER_REPOSITORY)?, "UserRepository");
    src.from(ctx.import(ids::USER_SCHEMAS)?, "UserCreate, UserUpdate");

    if !auth {
        src.block(
            r#"


def get_password_hash(password: str) -> str:
    # Placeholder until an authentication method is configured.
    return hashlib.sha256(password.encode()).hexdigest()
"#,
        );
    }

    src.blank().blank().line("class UserService:");
    if sql {
        src.line("    def __init__(self, session: AsyncSession) -> None:")
            .line("        self.repository = UserRepository(session)");
    } else {
        src.line("    def __init__(self) -> None:")
            .line("        self.repository = UserRepository()");
    }

    src.block(
        r#"

    async def get(self, user_id: int) -> User:
        user = await self.repository.get(user_id)
        if user is None:
            raise NotFoundError(f"User {user_id} not found")
        return user

    async def list_users(self, offset: int = 0, limit: int = 100) -> list[User]:
        return await self.repository.list_all(offset=offset, limit=limit)

    async def create(self, data: UserCreate) -> User:
        if await self.repository.get_by_email(data.email) is not None:
            raise ConflictError("Email already registered")
        return await self.repository.create(data, get_password_hash(data.password))

    async def update(self, user_id: int, data: UserUpdate) -> User:
        user = await self.get(user_id)
        if data.email is not None and data.email != user.email:
            if await self.repository.get_by_email(data.email) is not None:
                raise ConflictError("Email already registered")
        hashed = get_password_hash(data.password) if data.password else None
        return await self.repository.update(user, data, hashed)

    async def delete(self, user_id: int) -> None:
        user = await self.get(user_id)
        await self.repository.delete(user)
"#,
    );

    if auth {
        src.block(
            r#"

    async def authenticate(self, email: str, password: str) -> User:
        user = await self.repository.get_by_email(email)
        if user is None or not verify_password(password, user.hashed_password):
            raise AuthenticationError("Incorrect email or password")
        if not user.is_active:
            raise AuthenticationError("Inactive user")
        return user
"#,
        );
    }
    Ok(src.finish())
}

pub(crate) fn routes(ctx: &RenderContext<'_>) -> Rendered {
    let config = ctx.config();
    let sql = config.has_sql_session();
    let auth = config.has_auth();
    let mut src = Source::new();

    src.line("from fastapi import APIRouter, status").blank();
    if ctx.has(ids::DEPS) {
        let names = match (sql, auth) {
            (true, true) => "CurrentUser, DbSession",
            (true, false) => "DbSession",
            _ => "CurrentUser",
        };
        src.from(ctx.import(ids::DEPS)?, names);
    }
    src.from(ctx.import(ids::USER_SCHEMAS)?, "UserCreate, UserRead, UserUpdate");
    src.from(ctx.import(ids::USER_SERVICE)?, "UserService");
    src.blank().blank().line("router = APIRouter()");

    let mut params = Vec::new();
    if sql {
        params.push("db: DbSession");
    }
    if auth {
        params.push("_: CurrentUser");
    }
    let signature = |leading: &[&str], trailing: &[&str]| {
        leading
            .iter()
            .chain(&params)
            .chain(trailing)
            .copied()
            .collect::<Vec<_>>()
            .join(", ")
    };
    let service = if sql { "UserService(db)" } else { "UserService()" };

    src.blank()
        .blank()
        .line(r#"@router.get("/", response_model=list[UserRead])"#)
        .line(format!(
            "async def list_users({}) -> list[UserRead]:",
            signature(&[], &["offset: int = 0", "limit: int = 100"])
        ))
        .line(format!(
            "    users = await {service}.list_users(offset=offset, limit=limit)"
        ))
        .line("    return [UserRead.model_validate(user) for user in users]")
        .blank()
        .blank()
        .line(r#"@router.post("/", response_model=UserRead, status_code=status.HTTP_201_CREATED)"#)
        .line(format!(
            "async def create_user({}) -> UserRead:",
            signature(&["payload: UserCreate"], &[])
        ))
        .line(format!("    user = await {service}.create(payload)"))
        .line("    return UserRead.model_validate(user)")
        .blank()
        .blank()
        .line(r#"@router.get("/{user_id}", response_model=UserRead)"#)
        .line(format!(
            "async def get_user({}) -> UserRead:",
            signature(&["user_id: int"], &[])
        ))
        .line(format!("    user = await {service}.get(user_id)"))
        .line("    return UserRead.model_validate(user)")
        .blank()
        .blank()
        .line(r#"@router.patch("/{user_id}", response_model=UserRead)"#)
        .line(format!(
            "async def update_user({}) -> UserRead:",
            signature(&["user_id: int", "payload: UserUpdate"], &[])
        ))
        .line(format!("    user = await {service}.update(user_id, payload)"))
        .line("    return UserRead.model_validate(user)")
        .blank()
        .blank()
        .line(r#"@router.delete("/{user_id}", status_code=status.HTTP_204_NO_CONTENT)"#)
        .line(format!(
            "async def delete_user({}) -> None:",
            signature(&["user_id: int"], &[])
        ))
        .line(format!("    await {service}.delete(user_id)"));
    Ok(src.finish())
}
