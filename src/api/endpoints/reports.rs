//! `GET /reports`: clinic-wide counts and the invoice ledger.

use axum::extract::State;
use axum::response::Html;
use axum::Extension;
use rusqlite::Connection;

use crate::api::error::ApiError;
use crate::api::pages::{self, ClinicSummary};
use crate::api::types::{ApiContext, SessionContext};
use crate::db;
use crate::models::InvoiceFilter;

/// Counts shared by the admin dashboard and the reports page.
pub(crate) fn clinic_summary(conn: &Connection) -> Result<ClinicSummary, ApiError> {
    Ok(ClinicSummary {
        accounts_by_role: db::count_accounts_by_role(conn)?,
        doctors: db::list_doctors(conn)?.len(),
        patients: db::list_patients(conn)?.len(),
        appointments_by_status: db::count_appointments_by_status(conn)?,
        invoices_by_status: db::count_invoices_by_status(conn)?,
    })
}

pub async fn overview(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionContext>,
) -> Result<Html<String>, ApiError> {
    let conn = ctx.open_db()?;
    let summary = clinic_summary(&conn)?;
    let invoices = db::list_invoices(&conn, &InvoiceFilter::default())?;
    Ok(Html(pages::reports_page(&session, &summary, &invoices)))
}
