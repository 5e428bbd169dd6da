//! # Token Store Configuration
//!
//! Connection settings for the shared Redis instance holding session records.
//!
//! Reads from environment variables:
//! - `REDIS_URL`: connection URL, e.g. `redis://127.0.0.1:6379/0` (required)
//!
//! # Examples
//! ```rust
//! use pdf_vault::config::redis::RedisConfig;
//!
//! let cfg = RedisConfig::from_env_with(|_| Some("redis://127.0.0.1/".into())).unwrap();
//! assert_eq!(cfg.url, "redis://127.0.0.1/");
//! ```

use std::env;

use super::env::require_from;
use super::error::ConfigError;

/// Redis connection configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedisConfig {
    pub url: String,
}

impl RedisConfig {
    /// Builds a [`RedisConfig`] from environment variables.
    ///
    /// # Errors
    /// [`ConfigError::Missing`] when `REDIS_URL` is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|k| env::var(k).ok())
    }

    /// Builds a [`RedisConfig`] from a custom provider.
    ///
    /// # Errors
    /// - [`ConfigError::Missing`] when `REDIS_URL` is absent
    /// - [`ConfigError::Invalid`] when the URL scheme is not `redis`, `rediss` or `unix`
    pub fn from_env_with<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = require_from(&get, "REDIS_URL")?;
        let known_scheme = ["redis://", "rediss://", "unix://", "redis+unix://"]
            .iter()
            .any(|scheme| url.starts_with(scheme));
        if !known_scheme {
            return Err(ConfigError::invalid(
                "REDIS_URL",
                "expected a redis://, rediss:// or unix:// URL",
            ));
        }
        Ok(Self { url })
    }
}
