//! # Application Configuration Loader
//!
//! Unified configuration for the service: token policy, store connection,
//! chapter storage, HTTP listener and logging.
//!
//! Automatically loads `.env` files for non-production environments.
//! It checks for a custom `DOTENV_FILE` path first, then falls back to
//! `.env.{APP_ENV}` or `.env`.
//!
//! The configuration is loaded once at startup, validated, and then passed
//! by value into the components that need it. Nothing reads the environment
//! after startup.
//!
//! # Example
//! ```rust,no_run
//! use pdf_vault::config::app::AppConfig;
//!
//! let cfg = AppConfig::from_env().expect("invalid configuration");
//! println!("listening on {}", cfg.http.bind);
//! ```

use std::env;

use crate::config::{
    csrf::CsrfConfig,
    error::ConfigError,
    redis::RedisConfig,
    upload::UploadConfig,
    web::{HttpConfig, LogConfig},
};

/// Top-level application configuration.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Current environment name (`development`, `production`, ...).
    pub app_env: String,
    /// Token binding key, host/origin policy, TTL and budgets.
    pub csrf: CsrfConfig,
    /// Token store connection.
    pub redis: RedisConfig,
    /// Chapter storage root.
    pub upload: UploadConfig,
    /// HTTP listener configuration.
    pub http: HttpConfig,
    /// Log filter and format.
    pub log: LogConfig,
}

impl AppConfig {
    /// Loads application configuration from environment variables.
    ///
    /// ## Behavior
    /// - Reads `APP_ENV` (defaults to `"development"`).
    /// - Loads `.env` or `.env.{APP_ENV}` for non-production environments.
    /// - Validates every section; the first failure is returned.
    ///
    /// # Errors
    /// Any [`ConfigError`] raised by a section loader.
    pub fn from_env() -> Result<Self, ConfigError> {
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());

        if app_env != "production" {
            if let Ok(path) = env::var("DOTENV_FILE") {
                let _ = dotenvy::from_filename(path);
            } else {
                let candidate = format!(".env.{}", app_env);
                dotenvy::from_filename(&candidate)
                    .or_else(|_| dotenvy::dotenv())
                    .ok();
            }
        }

        Ok(AppConfig {
            app_env,
            csrf: CsrfConfig::from_env()?,
            redis: RedisConfig::from_env()?,
            upload: UploadConfig::from_env(),
            http: HttpConfig::from_env()?,
            log: LogConfig::from_env(),
        })
    }

    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }
}
