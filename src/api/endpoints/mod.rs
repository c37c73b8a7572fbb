//! Page and form handlers.
//!
//! Handlers trust the `SessionContext` injected by the policy middleware;
//! none of them re-check the caller's role.

pub mod appointments;
pub mod auth;
pub mod dashboards;
pub mod doctors;
pub mod health;
pub mod invoices;
pub mod patients;
pub mod records;
pub mod register;
pub mod reports;
pub mod services;
pub mod settings;

use crate::api::error::ApiError;
use crate::session::SessionContext;

/// Id of the doctor or patient row owned by the signed-in account.
pub(crate) fn require_profile(session: &SessionContext) -> Result<i64, ApiError> {
    session.profile_id.ok_or_else(|| {
        ApiError::NotFound(format!("No {} profile for {}", session.role, session.username))
    })
}
