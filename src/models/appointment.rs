use serde::{Deserialize, Serialize};

use super::enums::AppointmentStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub appointment_id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub appointment_date: String,
    pub appointment_time: String,
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub appointment_date: String,
    pub appointment_time: String,
}

/// Appointment joined with display names for listing pages.
#[derive(Debug, Clone, Serialize)]
pub struct AppointmentView {
    pub appointment: Appointment,
    pub patient_name: String,
    pub doctor_name: String,
}
