//! `GET /settings`: the signed-in account and its session.

use axum::extract::State;
use axum::response::Html;
use axum::Extension;

use crate::api::error::ApiError;
use crate::api::pages;
use crate::api::types::{ApiContext, SessionContext};
use crate::db;

pub async fn show(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionContext>,
) -> Result<Html<String>, ApiError> {
    let conn = ctx.open_db()?;
    let account = db::get_account(&conn, session.account_id)?
        .ok_or_else(|| ApiError::NotFound(format!("No account with id {}", session.account_id)))?;
    Ok(Html(pages::settings_page(
        &session,
        &account.created_at,
        ctx.config.session_ttl.as_secs(),
    )))
}
