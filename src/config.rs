//! Server configuration from environment variables. No process-wide implicit
//! state: the config struct is built once and handed to the constructors that
//! need it.

use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DATABASE_URL: &str = "postgres://localhost/invoices";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
}

impl AppConfig {
    /// Read `PORT`, `DATABASE_URL` and `DB_MAX_CONNECTIONS`, falling back to
    /// defaults where unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = parse_env("PORT", DEFAULT_PORT)?;
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.into());
        let max_connections = parse_env("DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        Ok(AppConfig {
            port,
            database_url,
            max_connections,
        })
    }
}

fn parse_env<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}
