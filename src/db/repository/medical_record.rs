use rusqlite::{params, Connection, OptionalExtension, Row};

use super::prescription::list_prescriptions_for_record;
use super::{doctor::require_doctor, patient::require_patient};
use crate::db::DatabaseError;
use crate::models::*;

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<MedicalRecord> {
    Ok(MedicalRecord {
        record_id: row.get(0)?,
        patient_id: row.get(1)?,
        doctor_id: row.get(2)?,
        visit_date: row.get(3)?,
        diagnosis: row.get(4)?,
        notes: row.get(5)?,
    })
}

pub fn insert_medical_record(
    conn: &Connection,
    record: &NewMedicalRecord,
) -> Result<i64, DatabaseError> {
    require_patient(conn, record.patient_id)?;
    require_doctor(conn, record.doctor_id)?;

    conn.execute(
        "INSERT INTO medical_records (patient_id, doctor_id, visit_date, diagnosis, notes)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            record.patient_id,
            record.doctor_id,
            record.visit_date,
            record.diagnosis,
            record.notes,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_medical_record(
    conn: &Connection,
    record_id: i64,
) -> Result<Option<MedicalRecord>, DatabaseError> {
    let record = conn
        .query_row(
            "SELECT record_id, patient_id, doctor_id, visit_date, diagnosis, notes
             FROM medical_records WHERE record_id = ?1",
            params![record_id],
            record_from_row,
        )
        .optional()?;
    Ok(record)
}

/// Records with names and prescriptions attached, most recent visit first.
pub fn list_records(
    conn: &Connection,
    filter: &RecordFilter,
) -> Result<Vec<RecordView>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT r.record_id, r.patient_id, r.doctor_id, r.visit_date, r.diagnosis, r.notes,
                p.first_name || ' ' || p.last_name,
                'Dr. ' || d.first_name || ' ' || d.last_name
         FROM medical_records r
         JOIN patients p ON p.patient_id = r.patient_id
         JOIN doctors d ON d.doctor_id = r.doctor_id
         WHERE (?1 IS NULL OR r.patient_id = ?1)
           AND (?2 IS NULL OR r.doctor_id = ?2)
         ORDER BY r.visit_date DESC, r.record_id DESC",
    )?;

    let rows = stmt.query_map(params![filter.patient_id, filter.doctor_id], |row| {
        Ok((
            record_from_row(row)?,
            row.get::<_, String>(6)?,
            row.get::<_, String>(7)?,
        ))
    })?;

    let mut views = Vec::new();
    for row in rows {
        let (record, patient_name, doctor_name) = row?;
        let prescriptions = list_prescriptions_for_record(conn, record.record_id)?;
        views.push(RecordView {
            record,
            patient_name,
            doctor_name,
            prescriptions,
        });
    }
    Ok(views)
}

pub(crate) fn require_record(conn: &Connection, record_id: i64) -> Result<(), DatabaseError> {
    match get_medical_record(conn, record_id)? {
        Some(_) => Ok(()),
        None => Err(DatabaseError::not_found("medical record", record_id)),
    }
}
