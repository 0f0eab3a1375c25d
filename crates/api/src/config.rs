use std::fmt::Display;
use std::str::FromStr;

use skillstack_core::engine::{EngineConfig, DEFAULT_CALENDAR_DAYS, DEFAULT_RECENT_SESSIONS};
use skillstack_core::user::DEFAULT_MIN_PASSWORD_LENGTH;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub jwt: JwtConfig,
    /// Progress engine tunables.
    pub engine: EngineConfig,
    /// Minimum accepted password length at registration (default: `6`).
    pub min_password_length: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                 |
    /// |-----------------------------|-------------------------|
    /// | `HOST`                      | `0.0.0.0`               |
    /// | `PORT`                      | `5000`                  |
    /// | `CORS_ORIGINS`              | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                    |
    /// | `DASHBOARD_RECENT_SESSIONS` | `10`                    |
    /// | `DASHBOARD_CALENDAR_DAYS`   | `30`                    |
    /// | `MIN_PASSWORD_LENGTH`       | `6`                     |
    ///
    /// # Panics
    ///
    /// Panics if a variable is set but cannot be parsed, or if the JWT
    /// settings are missing. Startup should fail loudly on misconfiguration.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let engine = EngineConfig {
            recent_sessions_limit: env_or("DASHBOARD_RECENT_SESSIONS", DEFAULT_RECENT_SESSIONS),
            calendar_days: env_or("DASHBOARD_CALENDAR_DAYS", DEFAULT_CALENDAR_DAYS),
        };
        assert!(
            engine.recent_sessions_limit > 0,
            "DASHBOARD_RECENT_SESSIONS must be positive"
        );
        assert!(
            engine.calendar_days >= 0,
            "DASHBOARD_CALENDAR_DAYS must not be negative"
        );

        Self {
            host,
            port: env_or("PORT", 5000),
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            jwt: JwtConfig::from_env(),
            engine,
            min_password_length: env_or("MIN_PASSWORD_LENGTH", DEFAULT_MIN_PASSWORD_LENGTH),
        }
    }
}

/// Parse `var` if it is set, otherwise return `default`.
pub(crate) fn env_or<T>(var: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{var} has an invalid value '{raw}': {e}")),
        Err(_) => default,
    }
}
