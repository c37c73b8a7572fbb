use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::crypto::DEFAULT_PBKDF2_ITERATIONS;
use crate::session::DEFAULT_SESSION_TTL_SECS;

/// Application-level constants
pub const APP_NAME: &str = "Fernandez Clinic";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
pub const DATABASE_FILE: &str = "fernandez_clinic.db";

/// Errors from reading configuration values.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("{0} is set but {1} is missing")]
    Incomplete(&'static str, &'static str),
}

/// Credentials for the admin account ensured at startup.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
}

/// Runtime configuration, read from `CLINIC_*` environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub session_ttl: Duration,
    pub secure_cookie: bool,
    pub password_iterations: u32,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = lookup("CLINIC_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(default_db_path);

        let bind_raw = lookup("CLINIC_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        let bind_addr = bind_raw.parse().map_err(|_| ConfigError::InvalidValue {
            key: "CLINIC_BIND_ADDR",
            value: bind_raw.clone(),
        })?;

        let session_ttl_secs = parse_or(
            &lookup,
            "CLINIC_SESSION_TTL_SECS",
            DEFAULT_SESSION_TTL_SECS,
        )?;
        if session_ttl_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "CLINIC_SESSION_TTL_SECS",
                value: "0".into(),
            });
        }
        let session_ttl = Duration::from_secs(session_ttl_secs);
        let password_iterations = parse_or(
            &lookup,
            "CLINIC_PASSWORD_ITERATIONS",
            DEFAULT_PBKDF2_ITERATIONS,
        )?;
        if password_iterations == 0 {
            return Err(ConfigError::InvalidValue {
                key: "CLINIC_PASSWORD_ITERATIONS",
                value: "0".into(),
            });
        }
        let secure_cookie = parse_or(&lookup, "CLINIC_SECURE_COOKIE", false)?;

        let bootstrap_admin = match (
            lookup("CLINIC_ADMIN_USERNAME"),
            lookup("CLINIC_ADMIN_PASSWORD"),
        ) {
            (Some(username), Some(password)) => Some(BootstrapAdmin { username, password }),
            (Some(_), None) => {
                return Err(ConfigError::Incomplete(
                    "CLINIC_ADMIN_USERNAME",
                    "CLINIC_ADMIN_PASSWORD",
                ))
            }
            (None, Some(_)) => {
                return Err(ConfigError::Incomplete(
                    "CLINIC_ADMIN_PASSWORD",
                    "CLINIC_ADMIN_USERNAME",
                ))
            }
            (None, None) => None,
        };

        Ok(Self {
            db_path,
            bind_addr,
            session_ttl,
            secure_cookie,
            password_iterations,
            bootstrap_admin,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
    }
}

/// Platform data dir (e.g. ~/.local/share/FernandezClinic), or the working
/// directory when the platform has none.
pub fn app_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("FernandezClinic")
}

pub fn default_db_path() -> PathBuf {
    app_data_dir().join(DATABASE_FILE)
}

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "info,tower_http=warn"
}
