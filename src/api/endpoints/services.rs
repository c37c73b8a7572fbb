//! `GET|POST /services`: billable service catalog.

use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Extension, Form};

use crate::api::error::ApiError;
use crate::api::forms::{all_present, ServiceForm, MISSING_FIELDS};
use crate::api::pages;
use crate::api::types::{ApiContext, SessionContext};
use crate::db;
use crate::models::NewService;

pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionContext>,
) -> Result<Html<String>, ApiError> {
    let conn = ctx.open_db()?;
    let services = db::list_services(&conn)?;
    Ok(Html(pages::services_page(&session, &services, None)))
}

pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionContext>,
    Form(form): Form<ServiceForm>,
) -> Result<Response, ApiError> {
    let conn = ctx.open_db()?;
    let service = NewService {
        name: form.name.trim().to_string(),
        description: form.description.trim().to_string(),
        fee: form.fee.trim().to_string(),
    };

    if !all_present(&[service.name.as_str(), service.fee.as_str()]) {
        let services = db::list_services(&conn)?;
        return Ok(
            Html(pages::services_page(&session, &services, Some(MISSING_FIELDS))).into_response(),
        );
    }

    let service_id = db::insert_service(&conn, &service)?;
    tracing::info!(service_id, "Service added");
    Ok(Redirect::to("/services").into_response())
}
