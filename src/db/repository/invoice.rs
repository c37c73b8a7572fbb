use std::str::FromStr;

use rusqlite::{params, Connection, Row};

use super::appointment::get_appointment;
use super::service::get_service;
use crate::db::DatabaseError;
use crate::models::*;

struct InvoiceRow {
    invoice_id: i64,
    appointment_id: i64,
    service_id: i64,
    amount: String,
    payment_status: String,
}

fn invoice_row_from_rusqlite(row: &Row<'_>) -> rusqlite::Result<InvoiceRow> {
    Ok(InvoiceRow {
        invoice_id: row.get(0)?,
        appointment_id: row.get(1)?,
        service_id: row.get(2)?,
        amount: row.get(3)?,
        payment_status: row.get(4)?,
    })
}

fn invoice_from_row(row: InvoiceRow) -> Result<Invoice, DatabaseError> {
    Ok(Invoice {
        invoice_id: row.invoice_id,
        appointment_id: row.appointment_id,
        service_id: row.service_id,
        amount: row.amount,
        payment_status: PaymentStatus::from_str(&row.payment_status)?,
    })
}

/// Bill an appointment for a service. A blank amount takes the service fee.
pub fn insert_invoice(conn: &Connection, invoice: &NewInvoice) -> Result<i64, DatabaseError> {
    if get_appointment(conn, invoice.appointment_id)?.is_none() {
        return Err(DatabaseError::not_found("appointment", invoice.appointment_id));
    }
    let service = get_service(conn, invoice.service_id)?
        .ok_or_else(|| DatabaseError::not_found("service", invoice.service_id))?;

    let amount = if invoice.amount.trim().is_empty() {
        service.fee
    } else {
        invoice.amount.clone()
    };

    conn.execute(
        "INSERT INTO invoices (appointment_id, service_id, amount, payment_status)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            invoice.appointment_id,
            invoice.service_id,
            amount,
            invoice.payment_status.as_str(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_invoices(
    conn: &Connection,
    filter: &InvoiceFilter,
) -> Result<Vec<InvoiceView>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT i.invoice_id, i.appointment_id, i.service_id, i.amount, i.payment_status,
                s.name, a.appointment_date, p.first_name || ' ' || p.last_name
         FROM invoices i
         JOIN services s ON s.service_id = i.service_id
         JOIN appointments a ON a.appointment_id = i.appointment_id
         JOIN patients p ON p.patient_id = a.patient_id
         WHERE (?1 IS NULL OR a.patient_id = ?1)
         ORDER BY i.invoice_id",
    )?;

    let rows = stmt.query_map(params![filter.patient_id], |row| {
        Ok((
            invoice_row_from_rusqlite(row)?,
            row.get::<_, String>(5)?,
            row.get::<_, String>(6)?,
            row.get::<_, String>(7)?,
        ))
    })?;

    let mut views = Vec::new();
    for row in rows {
        let (invoice, service_name, appointment_date, patient_name) = row?;
        views.push(InvoiceView {
            invoice: invoice_from_row(invoice)?,
            service_name,
            appointment_date,
            patient_name,
        });
    }
    Ok(views)
}

/// Invoice counts per payment status.
pub fn count_invoices_by_status(
    conn: &Connection,
) -> Result<Vec<(PaymentStatus, i64)>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT payment_status, COUNT(*) FROM invoices GROUP BY payment_status ORDER BY payment_status",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
    })?;

    let mut counts = Vec::new();
    for row in rows {
        let (status, count) = row?;
        counts.push((PaymentStatus::from_str(&status)?, count));
    }
    Ok(counts)
}
