//! - `GET /doctors`: staff directory
//! - `GET|POST /add_doctor`: create a doctor account with its profile

use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Extension, Form};

use crate::api::endpoints::register::{create_account, Registration, USERNAME_TAKEN};
use crate::api::error::ApiError;
use crate::api::forms::{all_present, AddDoctorForm, MISSING_FIELDS};
use crate::api::pages;
use crate::api::types::{ApiContext, SessionContext};
use crate::db::{self, NewProfile};
use crate::models::{NewDoctor, Role};

pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionContext>,
) -> Result<Html<String>, ApiError> {
    let conn = ctx.open_db()?;
    let doctors = db::list_doctors(&conn)?;
    Ok(Html(pages::doctors_page(&session, &doctors)))
}

pub async fn add_form(Extension(session): Extension<SessionContext>) -> Html<String> {
    Html(pages::add_doctor_page(&session, None))
}

pub async fn add(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionContext>,
    Form(form): Form<AddDoctorForm>,
) -> Result<Response, ApiError> {
    let render = |message: &str| -> Result<Response, ApiError> {
        Ok(Html(pages::add_doctor_page(&session, Some(message))).into_response())
    };

    let doctor = NewDoctor {
        first_name: form.first_name.trim().to_string(),
        last_name: form.last_name.trim().to_string(),
        specialization: form.specialization.trim().to_string(),
        contact_number: form.contact_number.trim().to_string(),
        email: form.email.trim().to_string(),
    };
    let username = form.username.trim();

    if !all_present(&[
        doctor.first_name.as_str(),
        doctor.last_name.as_str(),
        doctor.specialization.as_str(),
        doctor.contact_number.as_str(),
        doctor.email.as_str(),
        username,
        form.password.as_str(),
    ]) {
        return render(MISSING_FIELDS);
    }

    let profile = NewProfile::Doctor(doctor);
    match create_account(&ctx, username, &form.password, Role::Doctor, profile).await? {
        Registration::Created => Ok(Redirect::to("/doctors").into_response()),
        Registration::UsernameTaken => render(USERNAME_TAKEN),
    }
}
