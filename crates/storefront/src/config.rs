//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (postgres storage only;
//!   falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `STOREFRONT_STORAGE` - `postgres` or `memory` (default: postgres)
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_SIGN_IN_PATH` - Where unauthenticated shoppers are sent (default: /sign-in)
//! - `STOREFRONT_CURRENCY` - Store currency code (default: USD)
//! - `STOREFRONT_RELOAD_WISHLIST` - Restore the persisted wishlist at session start (default: false)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance trace sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

use hearth_core::CurrencyCode;

use crate::middleware::session::SESSION_EXPIRY_SECONDS;
use crate::store::{DEFAULT_SIGN_IN_PATH, StoreOptions};

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Where durable per-user storage and sessions live.
#[derive(Debug, Clone)]
pub enum StorageBackend {
    /// `PostgreSQL` tables (contains password in the URL).
    Postgres { database_url: SecretString },
    /// Process memory; contents are lost on restart.
    Memory,
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Storage and session backend
    pub storage: StorageBackend,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Redirect target for unauthenticated cart/wishlist operations
    pub sign_in_path: String,
    /// Currency used to display prices and totals
    pub currency: CurrencyCode,
    /// Restore the persisted wishlist at session start
    pub reload_wishlist: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry performance trace sample rate
    pub sentry_traces_sample_rate: f32,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let storage = match env.or_default("STOREFRONT_STORAGE", "postgres").as_str() {
            "postgres" => StorageBackend::Postgres {
                database_url: env.database_url("STOREFRONT_DATABASE_URL")?,
            },
            "memory" => StorageBackend::Memory,
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "STOREFRONT_STORAGE".to_string(),
                    format!("expected 'postgres' or 'memory', got '{other}'"),
                ));
            }
        };

        let host = env.parsed("STOREFRONT_HOST", "127.0.0.1")?;
        let port = env.parsed("STOREFRONT_PORT", "3000")?;
        let base_url = env.required("STOREFRONT_BASE_URL")?;

        let sign_in_path = env.or_default("STOREFRONT_SIGN_IN_PATH", DEFAULT_SIGN_IN_PATH);
        if !sign_in_path.starts_with('/') {
            return Err(ConfigError::InvalidEnvVar(
                "STOREFRONT_SIGN_IN_PATH".to_string(),
                "must be an absolute path".to_string(),
            ));
        }

        Ok(Self {
            storage,
            host,
            port,
            base_url,
            sign_in_path,
            currency: env.parsed("STOREFRONT_CURRENCY", "USD")?,
            reload_wishlist: env.parsed("STOREFRONT_RELOAD_WISHLIST", "false")?,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: env.parsed("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: env.parsed("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Options for every session's cart store.
    #[must_use]
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            sign_in_path: self.sign_in_path.clone(),
            reload_wishlist: self.reload_wishlist,
        }
    }

    /// How long an idle session's cart store stays in memory.
    #[must_use]
    pub const fn store_idle_timeout(&self) -> Duration {
        Duration::from_secs(SESSION_EXPIRY_SECONDS.unsigned_abs())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup with the storefront's defaulting rules.
struct Env<'a, F>(&'a F);

impl<F: Fn(&str) -> Option<String>> Env<'_, F> {
    /// Get an optional variable. Empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.is_empty())
    }

    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parsed<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.or_default(key, default)
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }

    /// Get database URL with fallback to generic `DATABASE_URL` (used by Fly.io postgres attach).
    fn database_url(&self, primary_key: &str) -> Result<SecretString, ConfigError> {
        self.optional(primary_key)
            .or_else(|| self.optional("DATABASE_URL"))
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar(primary_key.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_with_memory_storage() {
        let config = load(&[
            ("STOREFRONT_STORAGE", "memory"),
            ("STOREFRONT_BASE_URL", "http://localhost:3000"),
        ])
        .unwrap();

        assert!(matches!(config.storage, StorageBackend::Memory));
        assert_eq!(config.sign_in_path, "/sign-in");
        assert_eq!(config.currency, CurrencyCode::USD);
        assert!(!config.reload_wishlist);
        assert!(config.sentry_dsn.is_none());
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn test_postgres_requires_database_url() {
        let result = load(&[("STOREFRONT_BASE_URL", "http://localhost:3000")]);
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(key)) if key == "STOREFRONT_DATABASE_URL"));
    }

    #[test]
    fn test_database_url_fallback() {
        let config = load(&[
            ("STOREFRONT_BASE_URL", "https://shop.example.com"),
            ("DATABASE_URL", "postgres://fly/db"),
        ])
        .unwrap();

        match config.storage {
            StorageBackend::Postgres { database_url } => {
                assert_eq!(database_url.expose_secret(), "postgres://fly/db");
            }
            StorageBackend::Memory => panic!("expected postgres storage"),
        }
    }

    #[test]
    fn test_database_url_is_redacted_in_debug() {
        let config = load(&[
            ("STOREFRONT_BASE_URL", "https://shop.example.com"),
            ("STOREFRONT_DATABASE_URL", "postgres://user:hunter2@db/shop"),
        ])
        .unwrap();

        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("hunter2"));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("STOREFRONT_STORAGE", "memory"),
            ("STOREFRONT_BASE_URL", "http://localhost:8080"),
            ("STOREFRONT_PORT", "8080"),
            ("STOREFRONT_SIGN_IN_PATH", "/login"),
            ("STOREFRONT_CURRENCY", "eur"),
            ("STOREFRONT_RELOAD_WISHLIST", "true"),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.currency, CurrencyCode::EUR);

        let options = config.store_options();
        assert_eq!(options.sign_in_path, "/login");
        assert!(options.reload_wishlist);
    }

    #[test]
    fn test_invalid_values() {
        let base = ("STOREFRONT_BASE_URL", "http://localhost:3000");
        let memory = ("STOREFRONT_STORAGE", "memory");

        assert!(matches!(
            load(&[base, memory, ("STOREFRONT_PORT", "not-a-port")]),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
        assert!(matches!(
            load(&[base, ("STOREFRONT_STORAGE", "redis")]),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
        assert!(matches!(
            load(&[base, memory, ("STOREFRONT_SIGN_IN_PATH", "sign-in")]),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
        assert!(matches!(
            load(&[base, memory, ("STOREFRONT_CURRENCY", "XYZ")]),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
    }

    #[test]
    fn test_store_idle_timeout_matches_session_expiry() {
        let config = load(&[
            ("STOREFRONT_STORAGE", "memory"),
            ("STOREFRONT_BASE_URL", "http://localhost:3000"),
        ])
        .unwrap();

        assert_eq!(config.store_idle_timeout(), Duration::from_secs(7 * 24 * 60 * 60));
    }
}
