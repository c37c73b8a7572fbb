//! Access logging middleware.
//!
//! Logs every admitted request with method, path, account and response
//! status. Runs innermost, after the policy layer has injected
//! `SessionContext`.

use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::api::types::SessionContext;

pub async fn log_access(req: Request<axum::body::Body>, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let account = req
        .extensions()
        .get::<SessionContext>()
        .map(|s| s.username.clone())
        .unwrap_or_else(|| "anonymous".to_string());

    let response = next.run(req).await;

    tracing::info!(
        method = %method,
        path = %path,
        account = %account,
        status = response.status().as_u16(),
        "Request served"
    );

    response
}
