use std::str::FromStr;

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{doctor::require_doctor, patient::require_patient};
use crate::db::DatabaseError;
use crate::models::*;

struct AppointmentRow {
    appointment_id: i64,
    patient_id: i64,
    doctor_id: i64,
    appointment_date: String,
    appointment_time: String,
    status: String,
}

fn appointment_row_from_rusqlite(row: &Row<'_>) -> rusqlite::Result<AppointmentRow> {
    Ok(AppointmentRow {
        appointment_id: row.get(0)?,
        patient_id: row.get(1)?,
        doctor_id: row.get(2)?,
        appointment_date: row.get(3)?,
        appointment_time: row.get(4)?,
        status: row.get(5)?,
    })
}

fn appointment_from_row(row: AppointmentRow) -> Result<Appointment, DatabaseError> {
    Ok(Appointment {
        appointment_id: row.appointment_id,
        patient_id: row.patient_id,
        doctor_id: row.doctor_id,
        appointment_date: row.appointment_date,
        appointment_time: row.appointment_time,
        status: AppointmentStatus::from_str(&row.status)?,
    })
}

/// Book an appointment. New appointments always start as `scheduled`.
pub fn insert_appointment(
    conn: &Connection,
    appointment: &NewAppointment,
) -> Result<i64, DatabaseError> {
    require_patient(conn, appointment.patient_id)?;
    require_doctor(conn, appointment.doctor_id)?;

    conn.execute(
        "INSERT INTO appointments (patient_id, doctor_id, appointment_date, appointment_time, status)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            appointment.patient_id,
            appointment.doctor_id,
            appointment.appointment_date,
            appointment.appointment_time,
            AppointmentStatus::Scheduled.as_str(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_appointment(
    conn: &Connection,
    appointment_id: i64,
) -> Result<Option<Appointment>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT appointment_id, patient_id, doctor_id, appointment_date, appointment_time, status
             FROM appointments WHERE appointment_id = ?1",
            params![appointment_id],
            appointment_row_from_rusqlite,
        )
        .optional()?;
    row.map(appointment_from_row).transpose()
}

/// Appointments with patient and doctor names, soonest first.
pub fn list_appointments(
    conn: &Connection,
    filter: &AppointmentFilter,
) -> Result<Vec<AppointmentView>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT a.appointment_id, a.patient_id, a.doctor_id, a.appointment_date,
                a.appointment_time, a.status,
                p.first_name || ' ' || p.last_name,
                'Dr. ' || d.first_name || ' ' || d.last_name
         FROM appointments a
         JOIN patients p ON p.patient_id = a.patient_id
         JOIN doctors d ON d.doctor_id = a.doctor_id
         WHERE (?1 IS NULL OR a.patient_id = ?1)
           AND (?2 IS NULL OR a.doctor_id = ?2)
         ORDER BY a.appointment_date, a.appointment_time, a.appointment_id",
    )?;

    let rows = stmt.query_map(params![filter.patient_id, filter.doctor_id], |row| {
        Ok((
            appointment_row_from_rusqlite(row)?,
            row.get::<_, String>(6)?,
            row.get::<_, String>(7)?,
        ))
    })?;

    let mut views = Vec::new();
    for row in rows {
        let (appointment, patient_name, doctor_name) = row?;
        views.push(AppointmentView {
            appointment: appointment_from_row(appointment)?,
            patient_name,
            doctor_name,
        });
    }
    Ok(views)
}

pub fn count_appointments_by_status(
    conn: &Connection,
) -> Result<Vec<(AppointmentStatus, i64)>, DatabaseError> {
    let mut stmt =
        conn.prepare("SELECT status, COUNT(*) FROM appointments GROUP BY status ORDER BY status")?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
    })?;

    let mut counts = Vec::new();
    for row in rows {
        let (status, count) = row?;
        counts.push((AppointmentStatus::from_str(&status)?, count));
    }
    Ok(counts)
}
