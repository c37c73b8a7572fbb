//! Clinic web interface.
//!
//! Serves HTML pages and form handlers for admins, doctors and patients.
//! Every route passes through one policy middleware that resolves the
//! session cookie and checks the route table: Policy → Access log → Handler.
//!
//! The router is composable: `clinic_router()` returns a `Router` that
//! can be mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod forms;
pub mod middleware;
pub mod pages;
pub mod policy;
pub mod router;
pub mod server;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use router::clinic_router;
pub use server::{start_server_on, ClinicServer, ServerError, ServerSession};
pub use types::ApiContext;
