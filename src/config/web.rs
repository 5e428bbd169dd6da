//! # HTTP and Logging Configuration
//!
//! Listener settings for the HTTP server and the log output format.
//!
//! # Environment Variables
//! | Variable | Description | Default |
//! |-----------|-------------|----------|
//! | `HTTP_BIND` | Listen address | `0.0.0.0:8003` |
//! | `HTTP_MAX_BODY_BYTES` | Maximum request body size (bytes) | derived from `HTTP_MAX_BODY_MB` |
//! | `HTTP_MAX_BODY_MB` | Max body size in megabytes (if bytes not set) | `5` |
//! | `RUST_LOG` | `tracing` filter directives | `pdf_vault=info,tower_http=info` |
//! | `LOG_FORMAT` | `json` or `pretty` | `pretty` |
//!
//! # Examples
//! ```rust
//! use pdf_vault::config::web::{HttpConfig, LogConfig};
//!
//! let http = HttpConfig::from_env_with(|_| None).unwrap();
//! assert_eq!(http.bind.port(), 8003);
//! assert_eq!(http.max_body_bytes, 5 * 1024 * 1024);
//!
//! let log = LogConfig::from_env_with(|_| Some("json".into()));
//! assert!(log.json);
//! ```

use std::net::SocketAddr;

use super::env::read_parsed_from;
use super::error::ConfigError;

pub const DEFAULT_BIND: &str = "0.0.0.0:8003";
pub const DEFAULT_MAX_BODY_MB: usize = 5;
pub const DEFAULT_LOG_FILTER: &str = "pdf_vault=info,tower_http=info";

/// HTTP-related configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpConfig {
    pub bind: SocketAddr,
    pub max_body_bytes: usize,
}

impl HttpConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// # Errors
    /// [`ConfigError::Invalid`] for an unparsable address or size.
    pub fn from_env_with<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind = match read_parsed_from::<SocketAddr, _>(&get, "HTTP_BIND")? {
            Some(addr) => addr,
            None => DEFAULT_BIND
                .parse()
                .map_err(|_| ConfigError::invalid("HTTP_BIND", "bad default"))?,
        };

        let max_body_bytes = match read_parsed_from::<usize, _>(&get, "HTTP_MAX_BODY_BYTES")? {
            Some(bytes) => bytes,
            None => {
                read_parsed_from::<usize, _>(&get, "HTTP_MAX_BODY_MB")?
                    .unwrap_or(DEFAULT_MAX_BODY_MB)
                    * 1024
                    * 1024
            }
        };

        Ok(Self {
            bind,
            max_body_bytes,
        })
    }
}

/// Log output configuration, consumed by [`crate::telemetry::init`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogConfig {
    pub filter: String,
    pub json: bool,
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    pub fn from_env_with<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let filter = get("RUST_LOG")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        let json = get("LOG_FORMAT")
            .map(|s| s.trim().eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        Self { filter, json }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn http_defaults() {
        let cfg = HttpConfig::from_env_with(|_| None).unwrap();
        assert_eq!(cfg.bind, "0.0.0.0:8003".parse::<SocketAddr>().unwrap());
        assert_eq!(cfg.max_body_bytes, 5 * 1024 * 1024);
    }

    #[test]
    fn http_body_bytes_take_precedence_over_mb() {
        let mut m = HashMap::<&str, &str>::new();
        m.insert("HTTP_MAX_BODY_BYTES", "1234");
        m.insert("HTTP_MAX_BODY_MB", "9");
        let cfg = HttpConfig::from_env_with(|k| m.get(k).map(|s| s.to_string())).unwrap();
        assert_eq!(cfg.max_body_bytes, 1234);

        let cfg = HttpConfig::from_env_with(|k| (k == "HTTP_MAX_BODY_MB").then(|| "2".into()))
            .unwrap();
        assert_eq!(cfg.max_body_bytes, 2 * 1024 * 1024);
    }

    #[test]
    fn http_invalid_values_are_errors() {
        let err = HttpConfig::from_env_with(|k| (k == "HTTP_BIND").then(|| "nowhere".into()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "HTTP_BIND", .. }));

        let err = HttpConfig::from_env_with(|k| (k == "HTTP_MAX_BODY_MB").then(|| "lots".into()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "HTTP_MAX_BODY_MB", .. }));
    }

    #[test]
    fn log_config_reads_filter_and_format() {
        let cfg = LogConfig::from_env_with(|_| None);
        assert_eq!(cfg, LogConfig::default());

        let cfg = LogConfig::from_env_with(|k| match k {
            "RUST_LOG" => Some("debug".into()),
            "LOG_FORMAT" => Some("JSON".into()),
            _ => None,
        });
        assert_eq!(cfg.filter, "debug");
        assert!(cfg.json);
    }
}
