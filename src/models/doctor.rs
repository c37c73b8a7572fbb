use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub doctor_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub specialization: String,
    pub contact_number: String,
    pub email: String,
    pub account_id: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct NewDoctor {
    pub first_name: String,
    pub last_name: String,
    pub specialization: String,
    pub contact_number: String,
    pub email: String,
}

impl Doctor {
    pub fn full_name(&self) -> String {
        format!("Dr. {} {}", self.first_name, self.last_name)
    }
}
