//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CRESCENDO_DATABASE_URL` - `SQLite` connection string
//!   (default: `sqlite://crescendo.db?mode=rwc`; falls back to generic
//!   `DATABASE_URL` when unset)
//! - `CRESCENDO_HOST` - Bind address (default: 127.0.0.1)
//! - `CRESCENDO_PORT` - Listen port (default: 3000)
//! - `CRESCENDO_STOCK_POLICY` - `permissive` (default) or `strict`
//! - `CRESCENDO_ADMIN_PASSWORD` - Password for the seeded admin account;
//!   when unset, no admin account is seeded

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;

/// Default database location when nothing is configured.
const DEFAULT_DATABASE_URL: &str = "sqlite://crescendo.db?mode=rwc";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// How checkout treats insufficient stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StockPolicy {
    /// Decrement unconditionally; stock may go negative under concurrent
    /// overselling. Matches the historical storefront behavior.
    #[default]
    Permissive,
    /// Guarded decrement; the whole checkout fails when any line cannot be
    /// covered by remaining stock.
    Strict,
}

impl FromStr for StockPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "permissive" => Ok(Self::Permissive),
            "strict" => Ok(Self::Strict),
            _ => Err(format!("invalid stock policy: {s}")),
        }
    }
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `SQLite` database connection URL.
    pub database_url: String,
    /// IP address to bind the server to.
    pub host: IpAddr,
    /// Port to listen on.
    pub port: u16,
    /// Checkout stock policy.
    pub stock_policy: StockPolicy,
    /// Password for the seeded admin account, if configured.
    pub admin_password: Option<SecretString>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("CRESCENDO_DATABASE_URL");
        let host = get_env_or_default("CRESCENDO_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("CRESCENDO_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("CRESCENDO_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("CRESCENDO_PORT".to_string(), e.to_string()))?;
        let stock_policy = get_env_or_default("CRESCENDO_STOCK_POLICY", "permissive")
            .parse::<StockPolicy>()
            .map_err(|e| ConfigError::InvalidEnvVar("CRESCENDO_STOCK_POLICY".to_string(), e))?;
        let admin_password = get_optional_env("CRESCENDO_ADMIN_PASSWORD").map(SecretString::from);

        Ok(Self {
            database_url,
            host,
            port,
            stock_policy,
            admin_password,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            stock_policy: StockPolicy::default(),
            admin_password: None,
        }
    }
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> String {
    if let Ok(value) = std::env::var(primary_key) {
        return value;
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return value;
    }
    DEFAULT_DATABASE_URL.to_string()
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
