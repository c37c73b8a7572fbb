//! `POST /invoices`: bill an appointment for a service.

use std::str::FromStr;

use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Extension, Form};

use crate::api::endpoints::appointments::render_appointments;
use crate::api::error::ApiError;
use crate::api::forms::{parse_id, InvoiceForm, INVALID_ID};
use crate::api::types::{ApiContext, SessionContext};
use crate::db::{self, DatabaseError};
use crate::models::{NewInvoice, PaymentStatus};

pub const INVALID_PAYMENT_STATUS: &str = "Invalid payment status.";

pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionContext>,
    Form(form): Form<InvoiceForm>,
) -> Result<Response, ApiError> {
    let conn = ctx.open_db()?;
    let rerender = |message: &str| -> Result<Response, ApiError> {
        Ok(render_appointments(&conn, &session, Some(message))?.into_response())
    };

    let (Some(appointment_id), Some(service_id)) =
        (parse_id(&form.appointment_id), parse_id(&form.service_id))
    else {
        return rerender(INVALID_ID);
    };

    let payment_status = match form.payment_status.trim() {
        "" => PaymentStatus::Unpaid,
        raw => match PaymentStatus::from_str(raw) {
            Ok(status) => status,
            Err(_) => return rerender(INVALID_PAYMENT_STATUS),
        },
    };

    let invoice = NewInvoice {
        appointment_id,
        service_id,
        amount: form.amount.trim().to_string(),
        payment_status,
    };
    match db::insert_invoice(&conn, &invoice) {
        Ok(invoice_id) => {
            tracing::info!(invoice_id, appointment_id, service_id, "Invoice created");
            Ok(Redirect::to("/reports").into_response())
        }
        Err(DatabaseError::NotFound { .. }) => rerender(INVALID_ID),
        Err(e) => Err(e.into()),
    }
}
