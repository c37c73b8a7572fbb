//! Clinic router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//!
//! Middleware stack (outermost → innermost):
//! 1. Security headers → 2. Policy (session + route table) → 3. Access log

use axum::http::{header, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints::{
    appointments, auth, dashboards, doctors, health, invoices, patients, records, register,
    reports, services, settings,
};
use crate::api::middleware;
use crate::api::types::ApiContext;

/// Build the clinic router.
///
/// Middleware uses `Extension<ApiContext>` (injected as the outermost layer).
/// Endpoint handlers use `State<ApiContext>` (provided via `with_state`).
pub fn clinic_router(ctx: ApiContext) -> Router {
    // Policy and access log are route layers so unknown paths stay 404
    // and the policy sees the matched route pattern, not the raw URI.
    //
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    Router::new()
        .route("/", get(auth::login_form).post(auth::login))
        .route(
            "/admin/login",
            get(auth::admin_login_form).post(auth::admin_login),
        )
        .route("/logout", get(auth::logout).post(auth::logout))
        .route("/unauthorized", get(auth::unauthorized))
        .route(
            "/register",
            get(register::register_form).post(register::register),
        )
        .route(
            "/admin/register",
            get(register::admin_register_form).post(register::admin_register),
        )
        .route("/admin/dashboard", get(dashboards::admin))
        .route("/doctor/dashboard", get(dashboards::doctor))
        .route("/patient/dashboard", get(dashboards::patient))
        .route("/add_doctor", get(doctors::add_form).post(doctors::add))
        .route("/doctors", get(doctors::list))
        .route("/patients", get(patients::list))
        .route(
            "/appointments",
            get(appointments::list).post(appointments::book),
        )
        .route("/records", post(records::create))
        .route("/records/:id/prescriptions", post(records::prescribe))
        .route("/services", get(services::list).post(services::create))
        .route("/invoices", post(invoices::create))
        .route("/reports", get(reports::overview))
        .route("/settings", get(settings::show))
        .route("/health", get(health::check))
        .with_state(ctx.clone())
        // Route layers (innermost first, outermost last):
        .route_layer(axum::middleware::from_fn(middleware::audit::log_access))
        .route_layer(axum::middleware::from_fn(middleware::policy::enforce))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        // Extension must be outermost so middleware can extract ApiContext
        .layer(axum::Extension(ctx))
}
