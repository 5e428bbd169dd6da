//! # Telemetry
//!
//! Installs the global `tracing` subscriber: an [`EnvFilter`] built from
//! `RUST_LOG` plus either human-readable or JSON output (`LOG_FORMAT`).
//!
//! # Example
//! ```rust,no_run
//! use pdf_vault::config::web::LogConfig;
//!
//! pdf_vault::telemetry::init(&LogConfig::default()).expect("subscriber already set");
//! tracing::info!("ready");
//! ```

use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError, EnvFilter,
};

use crate::config::web::{LogConfig, DEFAULT_LOG_FILTER};

/// Parses the configured filter, falling back to the default directives
/// when it does not parse.
pub fn env_filter(cfg: &LogConfig) -> EnvFilter {
    EnvFilter::try_new(&cfg.filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Sets the global subscriber. Call once, before anything logs.
///
/// # Errors
/// [`TryInitError`] if a global subscriber is already installed.
pub fn init(cfg: &LogConfig) -> Result<(), TryInitError> {
    let json = cfg.json.then(|| fmt::layer().json().flatten_event(true));
    let pretty = (!cfg.json).then(fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter(cfg))
        .with(json)
        .with(pretty)
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_filter_falls_back_to_default() {
        let cfg = LogConfig {
            filter: "pdf_vault=loudest".into(),
            json: false,
        };
        let filter = env_filter(&cfg).to_string();
        assert!(filter.contains("pdf_vault=info"), "{filter}");
    }

    #[test]
    fn valid_filter_is_kept() {
        let cfg = LogConfig {
            filter: "debug".into(),
            json: true,
        };
        assert_eq!(env_filter(&cfg).to_string(), "debug");
    }

    #[test]
    fn second_init_fails() {
        let cfg = LogConfig {
            json: true,
            ..LogConfig::default()
        };
        assert!(init(&cfg).is_ok());
        assert!(init(&cfg).is_err());
    }
}
