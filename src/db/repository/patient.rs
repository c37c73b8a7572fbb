use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::DatabaseError;
use crate::models::*;

const PATIENT_COLUMNS: &str =
    "patient_id, first_name, last_name, birthdate, gender, contact_number, email, account_id";

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        patient_id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        birthdate: row.get(3)?,
        gender: row.get(4)?,
        contact_number: row.get(5)?,
        email: row.get(6)?,
        account_id: row.get(7)?,
    })
}

pub fn insert_patient(
    conn: &Connection,
    patient: &NewPatient,
    account_id: Option<i64>,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO patients (first_name, last_name, birthdate, gender, contact_number, email, account_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            patient.first_name,
            patient.last_name,
            patient.birthdate,
            patient.gender,
            patient.contact_number,
            patient.email,
            account_id,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_patient(conn: &Connection, patient_id: i64) -> Result<Option<Patient>, DatabaseError> {
    let patient = conn
        .query_row(
            &format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE patient_id = ?1"),
            params![patient_id],
            patient_from_row,
        )
        .optional()?;
    Ok(patient)
}

pub fn list_patients(conn: &Connection) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PATIENT_COLUMNS} FROM patients ORDER BY last_name, first_name, patient_id"
    ))?;
    let rows = stmt.query_map([], patient_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Patients who have an appointment or a record with the given doctor.
pub fn list_patients_for_doctor(
    conn: &Connection,
    doctor_id: i64,
) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PATIENT_COLUMNS} FROM patients
         WHERE patient_id IN (
             SELECT patient_id FROM appointments WHERE doctor_id = ?1
             UNION
             SELECT patient_id FROM medical_records WHERE doctor_id = ?1
         )
         ORDER BY last_name, first_name, patient_id"
    ))?;
    let rows = stmt.query_map(params![doctor_id], patient_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub(crate) fn require_patient(conn: &Connection, patient_id: i64) -> Result<(), DatabaseError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM patients WHERE patient_id = ?1)",
        params![patient_id],
        |row| row.get(0),
    )?;
    if exists {
        Ok(())
    } else {
        Err(DatabaseError::not_found("patient", patient_id))
    }
}
