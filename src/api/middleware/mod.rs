//! Request middleware.
//!
//! Execution order (outermost → innermost):
//! 1. Policy: resolve the session cookie, evaluate the route policy table,
//!    inject `SessionContext`
//! 2. Access log: one event per admitted request, after policy so the
//!    account is known

pub mod audit;
pub mod policy;
