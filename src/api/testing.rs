//! Shared fixtures for router and handler tests.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::api::types::{ApiContext, SESSION_COOKIE};
use crate::config::AppConfig;
use crate::db::{self, NewProfile, RegisteredAccount};
use crate::models::{NewAccount, NewDoctor, NewPatient, Role};

/// Low so tests hash quickly.
pub(crate) const TEST_ITERATIONS: u32 = 10;

pub(crate) fn test_config(dir: &Path) -> AppConfig {
    AppConfig {
        db_path: dir.join("clinic.db"),
        bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        session_ttl: Duration::from_secs(3600),
        secure_cookie: false,
        password_iterations: TEST_ITERATIONS,
        bootstrap_admin: None,
    }
}

/// Context over a migrated database in a fresh temp directory.
pub(crate) fn test_context() -> (ApiContext, TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let ctx = ApiContext::new(test_config(tmp.path())).unwrap();
    db::open_database(&ctx.config.db_path).unwrap();
    (ctx, tmp)
}

/// Insert an account with a profile matching its role. Profile names are
/// derived from the username.
pub(crate) fn seed_account(
    ctx: &ApiContext,
    username: &str,
    password: &str,
    role: Role,
) -> RegisteredAccount {
    let profile = match role {
        Role::Admin => NewProfile::None,
        Role::Doctor => NewProfile::Doctor(NewDoctor {
            first_name: username.to_string(),
            last_name: "Doctor".into(),
            specialization: "General".into(),
            contact_number: "555-0100".into(),
            email: format!("{username}@clinic.test"),
        }),
        Role::Patient => NewProfile::Patient(NewPatient {
            first_name: username.to_string(),
            last_name: "Patient".into(),
            birthdate: "1990-01-01".into(),
            gender: "F".into(),
            contact_number: "555-0199".into(),
            email: format!("{username}@mail.test"),
        }),
    };
    let account = NewAccount {
        username: username.to_string(),
        password_hash: ctx.hasher.hash(password).unwrap(),
        role,
    };
    let mut conn = ctx.open_db().unwrap();
    db::register_account(&mut conn, &account, &profile).unwrap()
}

pub(crate) fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// URL-encoded form POST. Values must not need percent-encoding.
pub(crate) fn post_form(
    uri: &str,
    fields: &[(&str, &str)],
    cookie: Option<&str>,
) -> Request<Body> {
    let body = fields
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body)).unwrap()
}

pub(crate) async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub(crate) async fn body_string(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub(crate) fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

/// `name=value` pair of the session cookie set by a response.
pub(crate) fn session_cookie(response: &Response<Body>) -> Option<String> {
    let prefix = format!("{SESSION_COOKIE}=");
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .find(|pair| pair.starts_with(&prefix) && pair.len() > prefix.len())
        .map(str::to_string)
}

/// Log in through `/` and return the cookie to send on later requests.
pub(crate) async fn login(app: &Router, username: &str, password: &str) -> String {
    let response = send(
        app,
        post_form("/", &[("username", username), ("password", password)], None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER, "login as {username}");
    session_cookie(&response).unwrap()
}
