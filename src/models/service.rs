use serde::{Deserialize, Serialize};

/// Billable catalog entry. `fee` is kept as entered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub service_id: i64,
    pub name: String,
    pub description: String,
    pub fee: String,
}

#[derive(Debug, Clone)]
pub struct NewService {
    pub name: String,
    pub description: String,
    pub fee: String,
}
