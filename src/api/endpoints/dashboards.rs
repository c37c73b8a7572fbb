//! Role dashboards: `/admin/dashboard`, `/doctor/dashboard`,
//! `/patient/dashboard`.

use axum::extract::State;
use axum::response::Html;
use axum::Extension;
use rusqlite::Connection;

use crate::api::endpoints::reports::clinic_summary;
use crate::api::endpoints::require_profile;
use crate::api::error::ApiError;
use crate::api::pages::{self, DoctorDashboard, PatientDashboard};
use crate::api::types::{ApiContext, SessionContext};
use crate::db;
use crate::models::{AppointmentFilter, InvoiceFilter, RecordFilter};

pub async fn admin(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionContext>,
) -> Result<Html<String>, ApiError> {
    let conn = ctx.open_db()?;
    let summary = clinic_summary(&conn)?;
    let appointments = db::list_appointments(&conn, &AppointmentFilter::default())?;
    Ok(Html(pages::admin_dashboard(&session, &summary, &appointments)))
}

pub async fn doctor(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionContext>,
) -> Result<Html<String>, ApiError> {
    let conn = ctx.open_db()?;
    render_doctor_dashboard(&conn, &session, None)
}

/// Doctor dashboard, optionally with a message from a rejected form.
pub(crate) fn render_doctor_dashboard(
    conn: &Connection,
    session: &SessionContext,
    error: Option<&str>,
) -> Result<Html<String>, ApiError> {
    let doctor_id = require_profile(session)?;
    let doctor = db::get_doctor(conn, doctor_id)?
        .ok_or_else(|| ApiError::NotFound(format!("No doctor with id {doctor_id}")))?;

    let appointments = db::list_appointments(
        conn,
        &AppointmentFilter {
            doctor_id: Some(doctor_id),
            ..Default::default()
        },
    )?;
    let records = db::list_records(
        conn,
        &RecordFilter {
            doctor_id: Some(doctor_id),
            ..Default::default()
        },
    )?;
    let patients = db::list_patients_for_doctor(conn, doctor_id)?;

    Ok(Html(pages::doctor_dashboard(
        session,
        &DoctorDashboard {
            doctor: &doctor,
            appointments: &appointments,
            records: &records,
            patients: &patients,
            error,
        },
    )))
}

pub async fn patient(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionContext>,
) -> Result<Html<String>, ApiError> {
    let patient_id = require_profile(&session)?;
    let conn = ctx.open_db()?;
    let patient = db::get_patient(&conn, patient_id)?
        .ok_or_else(|| ApiError::NotFound(format!("No patient with id {patient_id}")))?;

    let appointments = db::list_appointments(
        &conn,
        &AppointmentFilter {
            patient_id: Some(patient_id),
            ..Default::default()
        },
    )?;
    let records = db::list_records(
        &conn,
        &RecordFilter {
            patient_id: Some(patient_id),
            ..Default::default()
        },
    )?;
    let invoices = db::list_invoices(
        &conn,
        &InvoiceFilter {
            patient_id: Some(patient_id),
        },
    )?;
    let doctors = db::list_doctors(&conn)?;

    Ok(Html(pages::patient_dashboard(
        &session,
        &PatientDashboard {
            patient: &patient,
            appointments: &appointments,
            records: &records,
            invoices: &invoices,
            doctors: &doctors,
        },
    )))
}
