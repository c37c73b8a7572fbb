use rusqlite::{params, Connection, Row};

use super::medical_record::require_record;
use crate::db::DatabaseError;
use crate::models::*;

fn prescription_from_row(row: &Row<'_>) -> rusqlite::Result<Prescription> {
    Ok(Prescription {
        prescription_id: row.get(0)?,
        record_id: row.get(1)?,
        medication_name: row.get(2)?,
        dosage: row.get(3)?,
        instructions: row.get(4)?,
    })
}

pub fn insert_prescription(
    conn: &Connection,
    prescription: &NewPrescription,
) -> Result<i64, DatabaseError> {
    require_record(conn, prescription.record_id)?;

    conn.execute(
        "INSERT INTO prescriptions (record_id, medication_name, dosage, instructions)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            prescription.record_id,
            prescription.medication_name,
            prescription.dosage,
            prescription.instructions,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_prescriptions_for_record(
    conn: &Connection,
    record_id: i64,
) -> Result<Vec<Prescription>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT prescription_id, record_id, medication_name, dosage, instructions
         FROM prescriptions WHERE record_id = ?1 ORDER BY prescription_id",
    )?;
    let rows = stmt.query_map(params![record_id], prescription_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}
