//! `GET /patients`: every patient for admins, a doctor's own patients
//! for doctors.

use axum::extract::State;
use axum::response::Html;
use axum::Extension;

use crate::api::endpoints::require_profile;
use crate::api::error::ApiError;
use crate::api::pages;
use crate::api::types::{ApiContext, SessionContext};
use crate::db;
use crate::models::Role;

pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionContext>,
) -> Result<Html<String>, ApiError> {
    let conn = ctx.open_db()?;
    let patients = match session.role {
        Role::Doctor => db::list_patients_for_doctor(&conn, require_profile(&session)?)?,
        _ => db::list_patients(&conn)?,
    };
    Ok(Html(pages::patients_page(&session, &patients)))
}
