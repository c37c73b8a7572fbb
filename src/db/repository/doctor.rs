use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::DatabaseError;
use crate::models::*;

const DOCTOR_COLUMNS: &str =
    "doctor_id, first_name, last_name, specialization, contact_number, email, account_id";

fn doctor_from_row(row: &Row<'_>) -> rusqlite::Result<Doctor> {
    Ok(Doctor {
        doctor_id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        specialization: row.get(3)?,
        contact_number: row.get(4)?,
        email: row.get(5)?,
        account_id: row.get(6)?,
    })
}

pub fn insert_doctor(
    conn: &Connection,
    doctor: &NewDoctor,
    account_id: Option<i64>,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO doctors (first_name, last_name, specialization, contact_number, email, account_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            doctor.first_name,
            doctor.last_name,
            doctor.specialization,
            doctor.contact_number,
            doctor.email,
            account_id,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_doctor(conn: &Connection, doctor_id: i64) -> Result<Option<Doctor>, DatabaseError> {
    let doctor = conn
        .query_row(
            &format!("SELECT {DOCTOR_COLUMNS} FROM doctors WHERE doctor_id = ?1"),
            params![doctor_id],
            doctor_from_row,
        )
        .optional()?;
    Ok(doctor)
}

pub fn list_doctors(conn: &Connection) -> Result<Vec<Doctor>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {DOCTOR_COLUMNS} FROM doctors ORDER BY last_name, first_name, doctor_id"
    ))?;
    let rows = stmt.query_map([], doctor_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub(crate) fn require_doctor(conn: &Connection, doctor_id: i64) -> Result<(), DatabaseError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM doctors WHERE doctor_id = ?1)",
        params![doctor_id],
        |row| row.get(0),
    )?;
    if exists {
        Ok(())
    } else {
        Err(DatabaseError::not_found("doctor", doctor_id))
    }
}
