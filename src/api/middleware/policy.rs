//! Centralized authorization middleware.
//!
//! Resolves the session cookie, checks the matched route against
//! `api::policy::ROUTE_POLICY`, and injects the request-scoped
//! `SessionContext` for downstream handlers. Denied requests are
//! redirected to `/unauthorized`.

use axum::extract::MatchedPath;
use axum::http::{header, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::api::policy::{self, Access};
use crate::api::types::ApiContext;

pub async fn enforce(req: Request<axum::body::Body>, next: Next) -> Response {
    match enforce_inner(req, next).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

async fn enforce_inner(
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx: ApiContext = req
        .extensions()
        .get::<ApiContext>()
        .cloned()
        .ok_or(ApiError::Internal("missing API context".into()))?;

    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let session = ctx.session_from_headers(req.headers())?;
    let access = policy::required_access(req.method(), &route);

    let allowed = access.is_some_and(|a| a.permits(session.as_ref()));
    if !allowed {
        tracing::warn!(
            method = %req.method(),
            route = %route,
            role = session.as_ref().map(|s| s.role.as_str()).unwrap_or("anonymous"),
            "Access denied"
        );
        return Err(ApiError::Forbidden);
    }

    if let Some(session) = session {
        req.extensions_mut().insert(session);
    }

    let mut response = next.run(req).await;

    if access != Some(Access::Public) {
        response
            .headers_mut()
            .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    }

    Ok(response)
}
