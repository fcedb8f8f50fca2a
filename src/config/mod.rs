//! Configuration management for the voting service.
//!
//! All runtime settings come from environment variables (optionally loaded
//! from a `.env` file by `main`), with logged defaults suitable for local
//! development. Database connection handling lives in [`database`].

/// Database connection and schema management
pub mod database;

use crate::errors::{Error, Result};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_ACCESS_TOKEN_MINUTES: i64 = 5;
const DEFAULT_REFRESH_TOKEN_MINUTES: i64 = 24 * 60;
const DEV_JWT_SECRET: &str = "insecure-dev-secret-change-me";

/// Application-level settings shared across the HTTP surface.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Socket address the HTTP server binds to.
    pub bind_addr: String,
    /// HMAC secret for signing access and refresh tokens.
    pub jwt_secret: String,
    /// Lifetime of access tokens, minutes.
    pub access_token_minutes: i64,
    /// Lifetime of refresh tokens, minutes.
    pub refresh_token_minutes: i64,
    /// Password for the seeded `admin` account.
    pub admin_password: String,
}

/// Loads the application configuration from environment variables.
///
/// Missing variables fall back to development defaults; the fallback for
/// `JWT_SECRET` is logged as a warning since tokens signed with it are
/// forgeable by anyone reading this source.
///
/// # Errors
///
/// Returns [`Error::Config`] when a lifetime variable is present but not a
/// positive integer.
pub fn load_app_configuration() -> Result<AppConfig> {
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

    let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
        tracing::warn!("JWT_SECRET not set, using the built-in development secret");
        DEV_JWT_SECRET.to_string()
    });

    let access_token_minutes = minutes_var("ACCESS_TOKEN_MINUTES", DEFAULT_ACCESS_TOKEN_MINUTES)?;
    let refresh_token_minutes =
        minutes_var("REFRESH_TOKEN_MINUTES", DEFAULT_REFRESH_TOKEN_MINUTES)?;

    let admin_password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin".to_string());

    tracing::debug!(
        bind_addr,
        access_token_minutes,
        refresh_token_minutes,
        "loaded application configuration"
    );

    Ok(AppConfig {
        bind_addr,
        jwt_secret,
        access_token_minutes,
        refresh_token_minutes,
        admin_password,
    })
}

/// Reads a positive-integer minutes value from the environment.
fn minutes_var(name: &str, default: i64) -> Result<i64> {
    match std::env::var(name) {
        Ok(raw) => match raw.parse::<i64>() {
            Ok(minutes) if minutes > 0 => Ok(minutes),
            _ => Err(Error::Config {
                message: format!("{name} must be a positive integer, got {raw:?}"),
            }),
        },
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_load_app_configuration_yields_positive_lifetimes() {
        // Works with or without a .env in the test environment; the
        // defaults and any sane override are both positive.
        let config = load_app_configuration().unwrap();
        assert!(config.access_token_minutes > 0);
        assert!(config.refresh_token_minutes > 0);
        assert!(!config.bind_addr.is_empty());
    }

    #[test]
    fn test_minutes_var_falls_back_to_default_when_unset() {
        let minutes = minutes_var("NO_SUCH_LIFETIME_VARIABLE", 42).unwrap();
        assert_eq!(minutes, 42);
    }
}
