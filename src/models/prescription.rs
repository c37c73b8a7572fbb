use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prescription {
    pub prescription_id: i64,
    pub record_id: i64,
    pub medication_name: String,
    pub dosage: String,
    pub instructions: String,
}

#[derive(Debug, Clone)]
pub struct NewPrescription {
    pub record_id: i64,
    pub medication_name: String,
    pub dosage: String,
    pub instructions: String,
}
