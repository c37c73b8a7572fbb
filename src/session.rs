//! Server-side login sessions.
//!
//! The browser holds only an opaque random token; the store keys sessions
//! by the SHA-256 of that token. Sessions expire after a period of
//! inactivity.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::models::Role;

/// Default idle lifetime: 8 hours.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 8 * 60 * 60;

/// Authenticated identity for one request, injected into request
/// extensions by the policy middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub account_id: i64,
    pub username: String,
    pub role: Role,
    /// Patient id for patient accounts, doctor id for doctor accounts.
    pub profile_id: Option<i64>,
}

#[derive(Debug)]
struct SessionEntry {
    context: SessionContext,
    last_seen: Instant,
}

/// In-memory session table.
pub struct SessionStore {
    sessions: HashMap<[u8; 32], SessionEntry>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: HashMap::new(),
            ttl,
        }
    }

    /// Start a session and return the token to hand to the browser.
    pub fn create(&mut self, context: SessionContext) -> String {
        self.cleanup();
        let token = generate_token();
        self.sessions.insert(
            hash_token(&token),
            SessionEntry {
                context,
                last_seen: Instant::now(),
            },
        );
        token
    }

    /// Resolve a token, refreshing its idle timer. Expired sessions are
    /// dropped and resolve to `None`.
    pub fn resolve(&mut self, token: &str) -> Option<SessionContext> {
        let key = hash_token(token);
        let now = Instant::now();
        let expired = match self.sessions.get_mut(&key) {
            None => return None,
            Some(entry) if now.duration_since(entry.last_seen) >= self.ttl => true,
            Some(entry) => {
                entry.last_seen = now;
                return Some(entry.context.clone());
            }
        };
        if expired {
            self.sessions.remove(&key);
        }
        None
    }

    /// End a session. Returns `true` if the token was live.
    pub fn destroy(&mut self, token: &str) -> bool {
        self.sessions.remove(&hash_token(token)).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn cleanup(&mut self) {
        let now = Instant::now();
        let ttl = self.ttl;
        self.sessions
            .retain(|_, entry| now.duration_since(entry.last_seen) < ttl);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_SESSION_TTL_SECS))
    }
}

/// Hash a session token using SHA-256.
pub fn hash_token(token: &str) -> [u8; 32] {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().into()
}

/// Generate a random session token (URL-safe base64, 32 bytes of entropy).
pub fn generate_token() -> String {
    use base64::Engine;
    let bytes: [u8; 32] = rand::random();
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doctor_context() -> SessionContext {
        SessionContext {
            account_id: 7,
            username: "jrizal".into(),
            role: Role::Doctor,
            profile_id: Some(3),
        }
    }

    #[test]
    fn created_session_resolves() {
        let mut store = SessionStore::default();
        let token = store.create(doctor_context());
        assert_eq!(store.resolve(&token), Some(doctor_context()));
    }

    #[test]
    fn unknown_token_does_not_resolve() {
        let mut store = SessionStore::default();
        store.create(doctor_context());
        assert_eq!(store.resolve("forged-token"), None);
    }

    #[test]
    fn destroyed_session_no_longer_resolves() {
        let mut store = SessionStore::default();
        let token = store.create(doctor_context());
        assert!(store.destroy(&token));
        assert_eq!(store.resolve(&token), None);
        assert!(!store.destroy(&token));
    }

    #[test]
    fn tokens_are_unique_per_login() {
        let mut store = SessionStore::default();
        let t1 = store.create(doctor_context());
        let t2 = store.create(doctor_context());
        assert_ne!(t1, t2);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn idle_session_expires() {
        let mut store = SessionStore::new(Duration::from_secs(60));
        let token = generate_token();
        store.sessions.insert(
            hash_token(&token),
            SessionEntry {
                context: doctor_context(),
                last_seen: Instant::now() - Duration::from_secs(61),
            },
        );
        assert_eq!(store.resolve(&token), None);
        assert!(store.is_empty());
    }

    #[test]
    fn create_sweeps_expired_sessions() {
        let mut store = SessionStore::new(Duration::from_secs(60));
        store.sessions.insert(
            hash_token("stale"),
            SessionEntry {
                context: doctor_context(),
                last_seen: Instant::now() - Duration::from_secs(61),
            },
        );
        store.create(doctor_context());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn hash_token_is_deterministic() {
        assert_eq!(hash_token("test"), hash_token("test"));
        assert_ne!(hash_token("token-a"), hash_token("token-b"));
    }
}
