use serde::{Deserialize, Serialize};

use super::prescription::Prescription;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalRecord {
    pub record_id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub visit_date: String,
    pub diagnosis: String,
    pub notes: String,
}

#[derive(Debug, Clone)]
pub struct NewMedicalRecord {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub visit_date: String,
    pub diagnosis: String,
    pub notes: String,
}

/// A record with its prescriptions and the names of both parties.
#[derive(Debug, Clone, Serialize)]
pub struct RecordView {
    pub record: MedicalRecord,
    pub patient_name: String,
    pub doctor_name: String,
    pub prescriptions: Vec<Prescription>,
}
