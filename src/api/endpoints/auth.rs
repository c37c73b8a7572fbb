//! Login and logout.
//!
//! - `GET|POST /`: login for every role
//! - `GET|POST /admin/login`: login restricted to admin accounts
//! - `GET /logout`: destroy the session and expire the cookie
//! - `GET /unauthorized`: where denied requests land

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;

use crate::api::error::ApiError;
use crate::api::forms::{all_present, LoginForm};
use crate::api::pages;
use crate::api::types::{expired_session_cookie, read_session_token, ApiContext};
use crate::db::{find_account_by_username, find_profile_id};
use crate::models::Role;
use crate::session::SessionContext;

pub const INVALID_CREDENTIALS: &str = "Invalid credentials.";

/// Which accounts a login form accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoginScope {
    AnyRole,
    AdminOnly,
}

impl LoginScope {
    fn action(self) -> &'static str {
        match self {
            Self::AnyRole => "/",
            Self::AdminOnly => "/admin/login",
        }
    }

    fn heading(self) -> &'static str {
        match self {
            Self::AnyRole => "Login",
            Self::AdminOnly => "Administrator Login",
        }
    }

    fn render(self, error: Option<&str>) -> Html<String> {
        Html(pages::login_page(self.action(), self.heading(), error))
    }
}

pub async fn login_form() -> Html<String> {
    LoginScope::AnyRole.render(None)
}

pub async fn login(
    State(ctx): State<ApiContext>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    sign_in(&ctx, &headers, &form, LoginScope::AnyRole).await
}

pub async fn admin_login_form() -> Html<String> {
    LoginScope::AdminOnly.render(None)
}

pub async fn admin_login(
    State(ctx): State<ApiContext>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    sign_in(&ctx, &headers, &form, LoginScope::AdminOnly).await
}

/// Verify credentials and start a session for the stored account.
///
/// The destination comes from the role in the database; nothing the
/// browser submits can choose it.
async fn sign_in(
    ctx: &ApiContext,
    headers: &HeaderMap,
    form: &LoginForm,
    scope: LoginScope,
) -> Result<Response, ApiError> {
    let username = form.username.trim();
    if !all_present(&[username, form.password.as_str()]) {
        return Ok(scope.render(Some(INVALID_CREDENTIALS)).into_response());
    }

    let conn = ctx.open_db()?;
    let account = find_account_by_username(&conn, username)?;
    let verified = match &account {
        Some(found) => ctx.check_password(&form.password, &found.password_hash).await?,
        None => false,
    };
    let account = account
        .filter(|_| verified)
        .filter(|account| scope == LoginScope::AnyRole || account.role == Role::Admin);

    let Some(account) = account else {
        tracing::warn!(username, "Login rejected");
        return Ok(scope.render(Some(INVALID_CREDENTIALS)).into_response());
    };

    // A browser that was signed in as someone else loses that session.
    if let Some(previous) = read_session_token(headers) {
        ctx.end_session(&previous)?;
    }

    let profile_id = find_profile_id(&conn, &account)?;
    let token = ctx.start_session(SessionContext {
        account_id: account.account_id,
        username: account.username.clone(),
        role: account.role,
        profile_id,
    })?;

    tracing::info!(username = %account.username, role = %account.role, "Login succeeded");

    let mut response = Redirect::to(account.role.dashboard_path()).into_response();
    response
        .headers_mut()
        .insert(header::SET_COOKIE, ctx.session_cookie(&token)?);
    Ok(response)
}

pub async fn logout(
    State(ctx): State<ApiContext>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    if let Some(token) = read_session_token(&headers) {
        if ctx.end_session(&token)? {
            tracing::info!("Session ended");
        }
    }

    let mut response = Redirect::to("/").into_response();
    response
        .headers_mut()
        .insert(header::SET_COOKIE, expired_session_cookie());
    Ok(response)
}

pub async fn unauthorized() -> (StatusCode, &'static str) {
    (StatusCode::FORBIDDEN, "Unauthorized access")
}
