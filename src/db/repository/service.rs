use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::DatabaseError;
use crate::models::*;

fn service_from_row(row: &Row<'_>) -> rusqlite::Result<Service> {
    Ok(Service {
        service_id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        fee: row.get(3)?,
    })
}

pub fn insert_service(conn: &Connection, service: &NewService) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO services (name, description, fee) VALUES (?1, ?2, ?3)",
        params![service.name, service.description, service.fee],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_service(conn: &Connection, service_id: i64) -> Result<Option<Service>, DatabaseError> {
    let service = conn
        .query_row(
            "SELECT service_id, name, description, fee FROM services WHERE service_id = ?1",
            params![service_id],
            service_from_row,
        )
        .optional()?;
    Ok(service)
}

pub fn list_services(conn: &Connection) -> Result<Vec<Service>, DatabaseError> {
    let mut stmt =
        conn.prepare("SELECT service_id, name, description, fee FROM services ORDER BY name")?;
    let rows = stmt.query_map([], service_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}
