use std::str::FromStr;

use axum::http::HeaderValue;

use yamdb_core::paging::{clamp_page_size, DEFAULT_PAGE_SIZE};

use crate::auth::jwt::JwtConfig;

/// Default sender for confirmation emails when `MAIL_FROM` is not set.
const DEFAULT_MAIL_FROM: &str = "admin@yamdb.local";

/// Errors raised while reading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has invalid value '{value}'")]
    Invalid { var: &'static str, value: String },
}

/// Superuser ensured at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminBootstrap {
    pub username: String,
    pub email: String,
}

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Items per page on list endpoints (default: `10`).
    pub page_size: i64,
    /// `From` address of confirmation emails.
    pub mail_from: String,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Superuser to create or promote on startup, if configured.
    pub admin_bootstrap: Option<AdminBootstrap>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `DATABASE_URL`         | **required**               |
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `PAGE_SIZE`            | `10`                       |
    /// | `MAIL_FROM`            | `admin@yamdb.local`        |
    /// | `ADMIN_USERNAME`       | --                         |
    /// | `ADMIN_EMAIL`          | --                         |
    ///
    /// JWT variables are documented on [`JwtConfig::from_env`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = required_env("DATABASE_URL")?;
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = parse_env("PORT", 3000u16)?;

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if let Some(bad) = cors_origins
            .iter()
            .find(|o| o.parse::<HeaderValue>().is_err())
        {
            return Err(ConfigError::Invalid {
                var: "CORS_ORIGINS",
                value: bad.clone(),
            });
        }

        let request_timeout_secs = parse_env("REQUEST_TIMEOUT_SECS", 30u64)?;
        let page_size = clamp_page_size(parse_env("PAGE_SIZE", DEFAULT_PAGE_SIZE)?);
        let mail_from = std::env::var("MAIL_FROM").unwrap_or_else(|_| DEFAULT_MAIL_FROM.into());

        let admin_bootstrap = match (
            std::env::var("ADMIN_USERNAME").ok(),
            std::env::var("ADMIN_EMAIL").ok(),
        ) {
            (Some(username), Some(email)) => Some(AdminBootstrap { username, email }),
            _ => None,
        };

        Ok(Self {
            database_url,
            host,
            port,
            cors_origins,
            request_timeout_secs,
            page_size,
            mail_from,
            jwt: JwtConfig::from_env()?,
            admin_bootstrap,
        })
    }
}

/// Read a variable that has no default. Empty counts as unset.
pub(crate) fn required_env(var: &'static str) -> Result<String, ConfigError> {
    std::env::var(var)
        .ok()
        .filter(|s| !s.is_empty())
        .ok_or(ConfigError::Missing(var))
}

/// Read `var` and parse it, falling back to `default` when unset.
pub(crate) fn parse_env<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        Err(_) => Ok(default),
    }
}
