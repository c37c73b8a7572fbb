use serde::{Deserialize, Serialize};

use super::enums::PaymentStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub invoice_id: i64,
    pub appointment_id: i64,
    pub service_id: i64,
    pub amount: String,
    pub payment_status: PaymentStatus,
}

#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub appointment_id: i64,
    pub service_id: i64,
    pub amount: String,
    pub payment_status: PaymentStatus,
}

/// Invoice joined with its service name and appointment date.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceView {
    pub invoice: Invoice,
    pub service_name: String,
    pub appointment_date: String,
    pub patient_name: String,
}
