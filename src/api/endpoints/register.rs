//! Account creation.
//!
//! - `GET|POST /register`: public sign-up for patients and doctors
//! - `GET|POST /admin/register`: an admin creates another admin

use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Extension, Form};

use crate::api::error::ApiError;
use crate::api::forms::{all_present, AdminRegisterForm, RegisterForm, MISSING_FIELDS};
use crate::api::pages;
use crate::api::types::{ApiContext, SessionContext};
use crate::db::{self, DatabaseError, NewProfile};
use crate::models::{NewAccount, NewDoctor, NewPatient, Role};

pub const USERNAME_TAKEN: &str = "Username already exists.";
pub const INVALID_ROLE: &str = "Invalid role.";

/// Outcome of an account creation attempt.
pub(crate) enum Registration {
    Created,
    UsernameTaken,
}

/// Hash the password and insert the account with its profile.
///
/// The username is checked before hashing so a taken name costs no key
/// derivation; the insert re-checks inside its transaction.
pub(crate) async fn create_account(
    ctx: &ApiContext,
    username: &str,
    password: &str,
    role: Role,
    profile: NewProfile,
) -> Result<Registration, ApiError> {
    let mut conn = ctx.open_db()?;
    if db::username_exists(&conn, username)? {
        return Ok(Registration::UsernameTaken);
    }

    let account = NewAccount {
        username: username.to_string(),
        password_hash: ctx.hash_password(password).await?,
        role,
    };

    match db::register_account(&mut conn, &account, &profile) {
        Ok(created) => {
            tracing::info!(
                username,
                role = %role,
                account_id = created.account_id,
                profile_id = ?created.profile_id,
                "Account created"
            );
            Ok(Registration::Created)
        }
        Err(DatabaseError::DuplicateUsername(_)) => Ok(Registration::UsernameTaken),
        Err(e) => Err(e.into()),
    }
}

pub async fn register_form() -> Html<String> {
    Html(pages::register_page(None))
}

pub async fn register(
    State(ctx): State<ApiContext>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, ApiError> {
    let render = |message: &str| -> Result<Response, ApiError> {
        Ok(Html(pages::register_page(Some(message))).into_response())
    };

    let username = form.username.trim();
    let common = [
        form.role.trim(),
        form.first_name.trim(),
        form.last_name.trim(),
        form.email.trim(),
        form.phone.trim(),
        username,
        form.password.as_str(),
    ];
    if !all_present(&common) {
        return render(MISSING_FIELDS);
    }

    let (role, profile) = match form.role.trim() {
        "patient" => {
            if !all_present(&[form.birthdate.as_str()]) {
                return render(MISSING_FIELDS);
            }
            let patient = NewPatient {
                first_name: form.first_name.trim().to_string(),
                last_name: form.last_name.trim().to_string(),
                birthdate: form.birthdate.trim().to_string(),
                gender: form.gender.trim().to_string(),
                contact_number: form.phone.trim().to_string(),
                email: form.email.trim().to_string(),
            };
            (Role::Patient, NewProfile::Patient(patient))
        }
        "doctor" => {
            if !all_present(&[form.specialization.as_str()]) {
                return render(MISSING_FIELDS);
            }
            let doctor = NewDoctor {
                first_name: form.first_name.trim().to_string(),
                last_name: form.last_name.trim().to_string(),
                specialization: form.specialization.trim().to_string(),
                contact_number: form.phone.trim().to_string(),
                email: form.email.trim().to_string(),
            };
            (Role::Doctor, NewProfile::Doctor(doctor))
        }
        other => {
            tracing::warn!(role = other, "Registration with unsupported role");
            return render(INVALID_ROLE);
        }
    };

    match create_account(&ctx, username, &form.password, role, profile).await? {
        Registration::Created => Ok(Redirect::to("/").into_response()),
        Registration::UsernameTaken => render(USERNAME_TAKEN),
    }
}

pub async fn admin_register_form(Extension(session): Extension<SessionContext>) -> Html<String> {
    Html(pages::admin_register_page(&session, None))
}

pub async fn admin_register(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionContext>,
    Form(form): Form<AdminRegisterForm>,
) -> Result<Response, ApiError> {
    let render = |message: &str| -> Result<Response, ApiError> {
        Ok(Html(pages::admin_register_page(&session, Some(message))).into_response())
    };

    let username = form.username.trim();
    if !all_present(&[username, form.password.as_str()]) {
        return render(MISSING_FIELDS);
    }

    match create_account(&ctx, username, &form.password, Role::Admin, NewProfile::None).await? {
        Registration::Created => Ok(Redirect::to(Role::Admin.dashboard_path()).into_response()),
        Registration::UsernameTaken => render(USERNAME_TAKEN),
    }
}
