//! `GET|POST /appointments`: role-filtered listing and booking.
//!
//! Admins see and book everything; doctors see their own schedule;
//! patients see and book only for themselves.

use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Extension, Form};
use rusqlite::Connection;

use crate::api::endpoints::require_profile;
use crate::api::error::ApiError;
use crate::api::forms::{all_present, parse_id, AppointmentForm, INVALID_ID, MISSING_FIELDS};
use crate::api::pages::{self, AdminForms, AppointmentsPage};
use crate::api::types::{ApiContext, SessionContext};
use crate::db::{self, DatabaseError};
use crate::models::{AppointmentFilter, NewAppointment, Role};

/// Appointment filter matching what the caller may see.
fn visible_to(session: &SessionContext) -> Result<AppointmentFilter, ApiError> {
    Ok(match session.role {
        Role::Admin => AppointmentFilter::default(),
        Role::Doctor => AppointmentFilter {
            doctor_id: Some(require_profile(session)?),
            ..Default::default()
        },
        Role::Patient => AppointmentFilter {
            patient_id: Some(require_profile(session)?),
            ..Default::default()
        },
    })
}

/// Appointments page, optionally with a message from a rejected form.
/// Also used by the invoice form, which lives on this page.
pub(crate) fn render_appointments(
    conn: &Connection,
    session: &SessionContext,
    error: Option<&str>,
) -> Result<Html<String>, ApiError> {
    let appointments = db::list_appointments(conn, &visible_to(session)?)?;

    let (doctors, patients, services) = match session.role {
        Role::Admin => (
            db::list_doctors(conn)?,
            db::list_patients(conn)?,
            db::list_services(conn)?,
        ),
        Role::Patient => (db::list_doctors(conn)?, Vec::new(), Vec::new()),
        Role::Doctor => (Vec::new(), Vec::new(), Vec::new()),
    };

    let page = AppointmentsPage {
        appointments: &appointments,
        patient_booking: (session.role == Role::Patient).then_some(doctors.as_slice()),
        admin_forms: (session.role == Role::Admin).then_some(AdminForms {
            patients: &patients,
            doctors: &doctors,
            services: &services,
        }),
        error,
    };
    Ok(Html(pages::appointments_page(session, &page)))
}

pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionContext>,
) -> Result<Html<String>, ApiError> {
    let conn = ctx.open_db()?;
    render_appointments(&conn, &session, None)
}

pub async fn book(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionContext>,
    Form(form): Form<AppointmentForm>,
) -> Result<Response, ApiError> {
    let conn = ctx.open_db()?;
    let rerender = |message: &str| -> Result<Response, ApiError> {
        Ok(render_appointments(&conn, &session, Some(message))?.into_response())
    };

    let date = form.appointment_date.trim();
    let time = form.appointment_time.trim();
    if !all_present(&[form.doctor_id.as_str(), date, time]) {
        return rerender(MISSING_FIELDS);
    }

    let patient_id = match session.role {
        Role::Patient => Some(require_profile(&session)?),
        _ => parse_id(&form.patient_id),
    };
    let (Some(patient_id), Some(doctor_id)) = (patient_id, parse_id(&form.doctor_id)) else {
        return rerender(INVALID_ID);
    };

    let appointment = NewAppointment {
        patient_id,
        doctor_id,
        appointment_date: date.to_string(),
        appointment_time: time.to_string(),
    };
    match db::insert_appointment(&conn, &appointment) {
        Ok(appointment_id) => {
            tracing::info!(appointment_id, patient_id, doctor_id, "Appointment booked");
            let destination = match session.role {
                Role::Patient => Role::Patient.dashboard_path(),
                _ => "/appointments",
            };
            Ok(Redirect::to(destination).into_response())
        }
        Err(DatabaseError::NotFound { .. }) => rerender(INVALID_ID),
        Err(e) => Err(e.into()),
    }
}
