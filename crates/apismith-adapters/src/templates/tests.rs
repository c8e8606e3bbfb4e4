//! Generated pytest suite.

use apismith_core::domain::{AuthMethod, RenderContext};

use super::{Rendered, Source};
use crate::catalog::ids;

pub(crate) fn package(_: &RenderContext<'_>) -> Rendered {
    Ok(String::new())
}

pub(crate) fn conftest(ctx: &RenderContext<'_>) -> Rendered {
    let mut src = Source::new();
    src.line("import pytest")
        .line("from fastapi.testclient import TestClient")
        .blank()
        .from(ctx.import(ids::MAIN)?, "app");
    // No context manager: lifespan hooks stay off so tests need no services.
    src.block(
        r#"


@pytest.fixture
def client() -> TestClient:
    return TestClient(app)
"#,
    );
    Ok(src.finish())
}

pub(crate) fn health(_: &RenderContext<'_>) -> Rendered {
    Ok(Source::new()
        .block(
            r#"
from fastapi.testclient import TestClient


def test_health_reports_status(client: TestClient) -> None:
    response = client.get("/api/v1/health")
    assert response.status_code == 200
    assert response.json()["status"] in {"ok", "degraded"}


def test_root_links_to_docs(client: TestClient) -> None:
    response = client.get("/")
    assert response.status_code == 200
    assert response.json()["docs"] == "/docs"
"#,
        )
        .finish())
}

pub(crate) fn users(_: &RenderContext<'_>) -> Rendered {
    Ok(Source::new()
        .block(
            r#"
from fastapi.testclient import TestClient


def test_user_routes_are_mounted(client: TestClient) -> None:
    paths = client.get("/api/v1/openapi.json").json()["paths"]
    assert "/api/v1/users/" in paths
    assert "/api/v1/users/{user_id}" in paths


def test_create_user_rejects_invalid_payload(client: TestClient) -> None:
    response = client.post("/api/v1/users/", json={"email": "not-an-email"})
    assert response.status_code in (401, 422)
"#,
        )
        .finish())
}

pub(crate) fn auth(ctx: &RenderContext<'_>) -> Rendered {
    let session_auth = ctx.config().auth_method() == AuthMethod::Session;
    let mut src = Source::new();

    src.line("from fastapi.testclient import TestClient").blank();
    let (create, read) = if session_auth {
        ("create_session_token", "read_session_token")
    } else {
        ("create_access_token", "decode_access_token")
    };
    src.from(
        ctx.import(ids::SECURITY)?,
        &format!("{create}, {read}, get_password_hash, verify_password"),
    );

    src.block(
        r#"


def test_password_hash_roundtrip() -> None:
    hashed = get_password_hash("s3cret-pass")
    assert hashed != "s3cret-pass"
    assert verify_password("s3cret-pass", hashed)
    assert not verify_password("wrong-pass", hashed)


def test_token_roundtrip() -> None:
"#,
    )
    .line(format!(r#"    payload = {read}({create}("alice@example.com"))"#))
    .line(r#"    assert payload is not None"#)
    .line(r#"    assert payload["sub"] == "alice@example.com""#)
    .blank()
    .blank()
    .line("def test_tampered_token_is_rejected() -> None:")
    .line(format!(r#"    assert {read}("not-a-token") is None"#))
    .block(
        r#"


def test_me_requires_credentials(client: TestClient) -> None:
    response = client.get("/api/v1/auth/me")
    assert response.status_code == 401
"#,
    );
    Ok(src.finish())
}
