//! SQLAdmin panel mounted on the application.

use apismith_core::domain::{AuthMethod, RenderContext};

use super::{Rendered, Source};
use crate::catalog::ids;

pub(crate) fn views(ctx: &RenderContext<'_>) -> Rendered {
    let auth = ctx.has(ids::SECURITY);
    let check = match ctx.config().auth_method() {
        AuthMethod::Session => "read_session_token",
        _ => "decode_access_token",
    };
    let users = ctx.has(ids::USER_MODEL);
    let mut src = Source::new();

    src.line("from fastapi import FastAPI");
    let sqladmin = if users { "Admin, ModelView" } else { "Admin" };
    src.line(format!("from sqladmin import {sqladmin}"));
    if auth {
        src.line("from sqladmin.authentication import AuthenticationBackend")
            .line("from starlette.requests import Request");
    }
    src.blank();

    if auth {
        src.from(ctx.import(ids::SECURITY)?, &format!("SECRET_KEY, {check}"));
    }
    src.from(ctx.import(ids::DATABASE)?, "engine");
    if users {
        src.from(ctx.import(ids::USER_MODEL)?, "User");
        src.block(
            r#"


class UserAdmin(ModelView, model=User):
    name = "User"
    name_plural = "Users"
    icon = "fa-solid fa-user"
    can_create = False
    column_list = ["id", "email", "full_name", "is_active"]
    column_searchable_list = ["email"]
    form_excluded_columns = ["hashed_password"]
"#,
        );
    }

    if auth {
        src.block(
            r#"


class AdminAuth(AuthenticationBackend):
    """Accept any valid API token as the admin password."""

    async def login(self, request: Request) -> bool:
        form = await request.form()
        token = str(form.get("password", ""))
"#,
        )
        .line(format!("        if {check}(token) is None:"))
        .block(
            r#"
            return False
        request.session.update({"admin_token": token})
        return True

    async def logout(self, request: Request) -> bool:
        request.session.clear()
        return True

    async def authenticate(self, request: Request) -> bool:
        token = request.session.get("admin_token")
"#,
        )
        .line(format!("        return bool(token) and {check}(token) is not None"));
    }

    src.blank()
        .blank()
        .line("def setup_admin(app: FastAPI) -> Admin:");
    if auth {
        src.line("    admin = Admin(app, engine, authentication_backend=AdminAuth(secret_key=SECRET_KEY))");
    } else {
        src.line("    admin = Admin(app, engine)");
    }
    if users {
        src.line("    admin.add_view(UserAdmin)");
    }
    src.line("    return admin");
    Ok(src.finish())
}
