//! Submitted form bodies.
//!
//! Every field defaults to empty so a missing input reaches the handler
//! as a blank value and is reported inline instead of failing extraction.

use serde::Deserialize;

pub const MISSING_FIELDS: &str = "All fields are required.";
pub const INVALID_ID: &str = "Please choose a valid entry.";

/// True when every value is non-blank.
pub fn all_present(values: &[&str]) -> bool {
    values.iter().all(|v| !v.trim().is_empty())
}

/// Parse a numeric id from a select box.
pub fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|id| *id > 0)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub role: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub birthdate: String,
    pub gender: String,
    pub specialization: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AdminRegisterForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddDoctorForm {
    pub first_name: String,
    pub last_name: String,
    pub specialization: String,
    pub contact_number: String,
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppointmentForm {
    /// Ignored for patients, who always book for themselves.
    pub patient_id: String,
    pub doctor_id: String,
    pub appointment_date: String,
    pub appointment_time: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RecordForm {
    pub patient_id: String,
    pub visit_date: String,
    pub diagnosis: String,
    pub notes: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PrescriptionForm {
    pub medication_name: String,
    pub dosage: String,
    pub instructions: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ServiceForm {
    pub name: String,
    pub description: String,
    pub fee: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InvoiceForm {
    pub appointment_id: String,
    pub service_id: String,
    pub amount: String,
    pub payment_status: String,
}
