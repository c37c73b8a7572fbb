//! Shared state for the router and the session cookie plumbing.

use std::sync::{Arc, Mutex};

use axum::http::{header, HeaderMap, HeaderValue};
use rusqlite::Connection;
use zeroize::Zeroizing;

use crate::api::error::ApiError;
use crate::config::AppConfig;
use crate::crypto::{verify_password, CryptoError, PasswordHasher};
use crate::db;
use crate::session::SessionStore;

pub use crate::session::SessionContext;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "clinic_session";

// ═══════════════════════════════════════════════════════════
// API context: shared state for the router
// ═══════════════════════════════════════════════════════════

/// Shared context for all routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub config: Arc<AppConfig>,
    pub sessions: Arc<Mutex<SessionStore>>,
    pub hasher: PasswordHasher,
}

impl ApiContext {
    pub fn new(config: AppConfig) -> Result<Self, CryptoError> {
        let hasher = PasswordHasher::new(config.password_iterations)?;
        let sessions = SessionStore::new(config.session_ttl);
        Ok(Self {
            config: Arc::new(config),
            sessions: Arc::new(Mutex::new(sessions)),
            hasher,
        })
    }

    /// Open a database connection for the current request.
    pub fn open_db(&self) -> Result<Connection, ApiError> {
        db::open_connection(&self.config.db_path).map_err(ApiError::from)
    }

    // ── Passwords ───────────────────────────────────────────

    /// Hash a password for storage. Key derivation runs on the blocking
    /// pool.
    pub async fn hash_password(&self, password: &str) -> Result<String, ApiError> {
        let hasher = self.hasher;
        let password = Zeroizing::new(password.to_string());
        let hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| ApiError::Internal(format!("Password hashing task failed: {e}")))??;
        Ok(hash)
    }

    /// Check a password against a stored hash on the blocking pool.
    pub async fn check_password(&self, password: &str, stored: &str) -> Result<bool, ApiError> {
        let password = Zeroizing::new(password.to_string());
        let stored = stored.to_string();
        tokio::task::spawn_blocking(move || verify_password(&password, &stored))
            .await
            .map_err(|e| ApiError::Internal(format!("Password check task failed: {e}")))
    }

    // ── Sessions ────────────────────────────────────────────

    pub fn start_session(&self, context: SessionContext) -> Result<String, ApiError> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| ApiError::Internal("session lock".into()))?;
        Ok(sessions.create(context))
    }

    pub fn resolve_session(&self, token: &str) -> Result<Option<SessionContext>, ApiError> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| ApiError::Internal("session lock".into()))?;
        Ok(sessions.resolve(token))
    }

    pub fn end_session(&self, token: &str) -> Result<bool, ApiError> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| ApiError::Internal("session lock".into()))?;
        Ok(sessions.destroy(token))
    }

    /// Resolve the session named by the request's cookie, if any.
    pub fn session_from_headers(
        &self,
        headers: &HeaderMap,
    ) -> Result<Option<SessionContext>, ApiError> {
        match read_session_token(headers) {
            Some(token) => self.resolve_session(&token),
            None => Ok(None),
        }
    }

    // ── Cookies ─────────────────────────────────────────────

    /// `Set-Cookie` value that hands a new session token to the browser.
    pub fn session_cookie(&self, token: &str) -> Result<HeaderValue, ApiError> {
        let secure = if self.config.secure_cookie { "; Secure" } else { "" };
        let value = format!(
            "{SESSION_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}{secure}",
            self.config.session_ttl.as_secs()
        );
        HeaderValue::from_str(&value).map_err(|e| ApiError::Internal(e.to_string()))
    }
}

/// `Set-Cookie` value that removes the session cookie.
pub fn expired_session_cookie() -> HeaderValue {
    HeaderValue::from_static("clinic_session=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0")
}

/// Extract the session token from the request's `Cookie` headers.
pub fn read_session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}
