//! Medical records written by doctors.
//!
//! - `POST /records`: record a visit for one of the doctor's patients
//! - `POST /records/:id/prescriptions`: prescribe on a record the
//!   doctor authored

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Extension, Form};

use crate::api::endpoints::dashboards::render_doctor_dashboard;
use crate::api::endpoints::require_profile;
use crate::api::error::ApiError;
use crate::api::forms::{
    all_present, parse_id, PrescriptionForm, RecordForm, INVALID_ID, MISSING_FIELDS,
};
use crate::api::types::{ApiContext, SessionContext};
use crate::db::{self, DatabaseError};
use crate::models::{NewMedicalRecord, NewPrescription, Role};

pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionContext>,
    Form(form): Form<RecordForm>,
) -> Result<Response, ApiError> {
    let doctor_id = require_profile(&session)?;
    let conn = ctx.open_db()?;
    let rerender = |message: &str| -> Result<Response, ApiError> {
        Ok(render_doctor_dashboard(&conn, &session, Some(message))?.into_response())
    };

    let visit_date = form.visit_date.trim();
    let diagnosis = form.diagnosis.trim();
    if !all_present(&[form.patient_id.as_str(), visit_date, diagnosis]) {
        return rerender(MISSING_FIELDS);
    }
    let Some(patient_id) = parse_id(&form.patient_id) else {
        return rerender(INVALID_ID);
    };
    let linked = db::list_patients_for_doctor(&conn, doctor_id)?;
    if !linked.iter().any(|patient| patient.patient_id == patient_id) {
        tracing::warn!(patient_id, doctor_id, "Record for a patient outside the doctor's list");
        return rerender(INVALID_ID);
    }

    let record = NewMedicalRecord {
        patient_id,
        doctor_id,
        visit_date: visit_date.to_string(),
        diagnosis: diagnosis.to_string(),
        notes: form.notes.trim().to_string(),
    };
    match db::insert_medical_record(&conn, &record) {
        Ok(record_id) => {
            tracing::info!(record_id, patient_id, doctor_id, "Medical record created");
            Ok(Redirect::to(Role::Doctor.dashboard_path()).into_response())
        }
        Err(DatabaseError::NotFound { .. }) => rerender(INVALID_ID),
        Err(e) => Err(e.into()),
    }
}

pub async fn prescribe(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionContext>,
    Path(record_id): Path<i64>,
    Form(form): Form<PrescriptionForm>,
) -> Result<Response, ApiError> {
    let doctor_id = require_profile(&session)?;
    let conn = ctx.open_db()?;

    let record = db::get_medical_record(&conn, record_id)?
        .ok_or_else(|| ApiError::NotFound(format!("No medical record with id {record_id}")))?;
    if record.doctor_id != doctor_id {
        tracing::warn!(record_id, doctor_id, "Prescription on another doctor's record");
        return Err(ApiError::Forbidden);
    }

    let medication_name = form.medication_name.trim();
    let dosage = form.dosage.trim();
    if !all_present(&[medication_name, dosage]) {
        return Ok(render_doctor_dashboard(&conn, &session, Some(MISSING_FIELDS))?.into_response());
    }

    let prescription_id = db::insert_prescription(
        &conn,
        &NewPrescription {
            record_id,
            medication_name: medication_name.to_string(),
            dosage: dosage.to_string(),
            instructions: form.instructions.trim().to_string(),
        },
    )?;
    tracing::info!(prescription_id, record_id, "Prescription added");
    Ok(Redirect::to(Role::Doctor.dashboard_path()).into_response())
}
