//! # CSRF Configuration
//!
//! Settings for token issuance and request validation.
//!
//! The configuration reads from environment variables:
//! - `ENCRYPTION_KEY`: 32-byte AES-256 key used by the binder (required)
//! - `ENCRYPTION_ROUNDS`: binder work factor, 1 to 10000 (required)
//! - `CSRF_ALLOWED_HOST`: the only accepted `Host` header value (required)
//! - `CSRF_CHECK_ORIGIN`: enables the `Origin` check (default: `false`)
//! - `CSRF_ALLOWED_ORIGIN`: the only accepted `Origin` (required when the check is on)
//! - `CSRF_TOKEN_TTL_SECS`: lifetime of an issued token pair (default: `3600`)
//! - `CSRF_DEFAULT_MAX_USES`: use budget when the caller asks for none (default: `1`)
//! - `CSRF_MAX_USES_LIMIT`: largest budget a caller may request (default: `100`)
//!
//! # Examples
//! ```rust
//! use pdf_vault::config::csrf::CsrfConfig;
//!
//! let cfg = CsrfConfig::from_env_with(|k| match k {
//!     "ENCRYPTION_KEY" => Some("0123456789abcdef0123456789abcdef".into()),
//!     "ENCRYPTION_ROUNDS" => Some("3".into()),
//!     "CSRF_ALLOWED_HOST" => Some("files.example.com".into()),
//!     _ => None,
//! })
//! .unwrap();
//!
//! assert_eq!(cfg.rounds, 3);
//! assert!(!cfg.check_origin);
//! assert_eq!(cfg.token_ttl.as_secs(), 3600);
//! ```

use std::{env as std_env, fmt, time::Duration};

use super::env::{read_flag_from, read_parsed_from, require_from};
use super::error::ConfigError;

/// Required length of `ENCRYPTION_KEY` in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// Upper bound on `ENCRYPTION_ROUNDS`. Every guarded POST binds twice.
pub const MAX_ROUNDS: u32 = 10_000;

pub const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;
pub const DEFAULT_MAX_USES: u32 = 1;
pub const DEFAULT_MAX_USES_LIMIT: u32 = 100;

/// Configuration for CSRF token issuance and validation.
#[derive(Clone, PartialEq, Eq)]
pub struct CsrfConfig {
    /// Raw AES-256 key, exactly [`KEY_LEN`] bytes.
    pub encryption_key: Vec<u8>,
    /// Number of binder rounds, `1..=MAX_ROUNDS`.
    pub rounds: u32,
    /// Exact `Host` header value every guarded request must carry.
    pub allowed_host: String,
    /// Exact `Origin` header value, when origin checking is enabled.
    pub allowed_origin: Option<String>,
    pub check_origin: bool,
    /// Lifetime of an issued session record.
    pub token_ttl: Duration,
    /// Budget applied when `/token` is called without `max_uses`.
    pub default_max_uses: u32,
    /// Largest budget a caller may request.
    pub max_uses_limit: u32,
}

impl CsrfConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    /// See [`CsrfConfig::from_env_with`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|k| std_env::var(k).ok())
    }

    /// Loads configuration using a custom key provider (for testing/mocking).
    ///
    /// # Errors
    /// - [`ConfigError::Missing`] for an absent required variable
    /// - [`ConfigError::Invalid`] for a key that is not 32 bytes, rounds
    ///   outside `1..=MAX_ROUNDS`, a zero TTL or budget, or a default budget
    ///   above the limit
    pub fn from_env_with<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let encryption_key = require_from(&get, "ENCRYPTION_KEY")?.into_bytes();
        if encryption_key.len() != KEY_LEN {
            return Err(ConfigError::invalid(
                "ENCRYPTION_KEY",
                format!("must be exactly {KEY_LEN} bytes, got {}", encryption_key.len()),
            ));
        }

        let rounds = read_parsed_from::<u32, _>(&get, "ENCRYPTION_ROUNDS")?
            .ok_or(ConfigError::Missing("ENCRYPTION_ROUNDS"))?;
        if rounds == 0 {
            return Err(ConfigError::invalid("ENCRYPTION_ROUNDS", "must be at least 1"));
        }
        if rounds > MAX_ROUNDS {
            return Err(ConfigError::invalid(
                "ENCRYPTION_ROUNDS",
                format!("must be at most {MAX_ROUNDS}, got {rounds}"),
            ));
        }

        let allowed_host = require_from(&get, "CSRF_ALLOWED_HOST")?;

        let check_origin = read_flag_from(&get, "CSRF_CHECK_ORIGIN", false);
        let allowed_origin = if check_origin {
            Some(require_from(&get, "CSRF_ALLOWED_ORIGIN")?)
        } else {
            require_from(&get, "CSRF_ALLOWED_ORIGIN").ok()
        };

        let ttl_secs = read_parsed_from::<u64, _>(&get, "CSRF_TOKEN_TTL_SECS")?
            .unwrap_or(DEFAULT_TOKEN_TTL_SECS);
        if ttl_secs == 0 {
            return Err(ConfigError::invalid("CSRF_TOKEN_TTL_SECS", "must be positive"));
        }

        let default_max_uses = read_parsed_from::<u32, _>(&get, "CSRF_DEFAULT_MAX_USES")?
            .unwrap_or(DEFAULT_MAX_USES);
        let max_uses_limit = read_parsed_from::<u32, _>(&get, "CSRF_MAX_USES_LIMIT")?
            .unwrap_or(DEFAULT_MAX_USES_LIMIT);
        if default_max_uses == 0 {
            return Err(ConfigError::invalid("CSRF_DEFAULT_MAX_USES", "must be at least 1"));
        }
        if default_max_uses > max_uses_limit {
            return Err(ConfigError::invalid(
                "CSRF_DEFAULT_MAX_USES",
                format!("exceeds CSRF_MAX_USES_LIMIT ({max_uses_limit})"),
            ));
        }

        Ok(Self {
            encryption_key,
            rounds,
            allowed_host,
            allowed_origin,
            check_origin,
            token_ttl: Duration::from_secs(ttl_secs),
            default_max_uses,
            max_uses_limit,
        })
    }
}

impl fmt::Debug for CsrfConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CsrfConfig")
            .field("encryption_key", &"<redacted>")
            .field("rounds", &self.rounds)
            .field("allowed_host", &self.allowed_host)
            .field("allowed_origin", &self.allowed_origin)
            .field("check_origin", &self.check_origin)
            .field("token_ttl", &self.token_ttl)
            .field("default_max_uses", &self.default_max_uses)
            .field("max_uses_limit", &self.max_uses_limit)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const KEY: &str = "0123456789abcdef0123456789abcdef";

    fn base() -> HashMap<String, String> {
        let mut m = HashMap::new();
        m.insert("ENCRYPTION_KEY".into(), KEY.into());
        m.insert("ENCRYPTION_ROUNDS".into(), "5".into());
        m.insert("CSRF_ALLOWED_HOST".into(), "localhost:8003".into());
        m
    }

    fn load(m: &HashMap<String, String>) -> Result<CsrfConfig, ConfigError> {
        CsrfConfig::from_env_with(|k| m.get(k).cloned())
    }

    #[test]
    fn from_env_with_applies_defaults() {
        let cfg = load(&base()).unwrap();

        assert_eq!(cfg.encryption_key, KEY.as_bytes());
        assert_eq!(cfg.rounds, 5);
        assert_eq!(cfg.allowed_host, "localhost:8003");
        assert!(!cfg.check_origin);
        assert_eq!(cfg.allowed_origin, None);
        assert_eq!(cfg.token_ttl, Duration::from_secs(3600));
        assert_eq!(cfg.default_max_uses, 1);
        assert_eq!(cfg.max_uses_limit, 100);
    }

    #[test]
    fn from_env_with_respects_overrides() {
        let mut m = base();
        m.insert("CSRF_CHECK_ORIGIN".into(), "true".into());
        m.insert("CSRF_ALLOWED_ORIGIN".into(), "https://app.example".into());
        m.insert("CSRF_TOKEN_TTL_SECS".into(), "60".into());
        m.insert("CSRF_DEFAULT_MAX_USES".into(), "3".into());
        m.insert("CSRF_MAX_USES_LIMIT".into(), "10".into());

        let cfg = load(&m).unwrap();
        assert!(cfg.check_origin);
        assert_eq!(cfg.allowed_origin.as_deref(), Some("https://app.example"));
        assert_eq!(cfg.token_ttl, Duration::from_secs(60));
        assert_eq!(cfg.default_max_uses, 3);
        assert_eq!(cfg.max_uses_limit, 10);
    }

    #[test]
    fn required_variables_fail_fast() {
        for name in ["ENCRYPTION_KEY", "ENCRYPTION_ROUNDS", "CSRF_ALLOWED_HOST"] {
            let mut m = base();
            m.remove(name);
            let err = load(&m).unwrap_err();
            assert_eq!(err, ConfigError::Missing(name), "{name}");
        }
    }

    #[test]
    fn origin_is_required_only_when_check_enabled() {
        let mut m = base();
        m.insert("CSRF_CHECK_ORIGIN".into(), "1".into());
        assert_eq!(
            load(&m).unwrap_err(),
            ConfigError::Missing("CSRF_ALLOWED_ORIGIN")
        );
    }

    #[test]
    fn key_of_wrong_length_is_rejected() {
        let mut m = base();
        m.insert("ENCRYPTION_KEY".into(), "too-short".into());
        let err = load(&m).unwrap_err();
        assert!(err.to_string().contains("exactly 32 bytes"));
    }

    #[test]
    fn zero_rounds_and_bad_budgets_are_rejected() {
        let mut m = base();
        m.insert("ENCRYPTION_ROUNDS".into(), "0".into());
        assert!(load(&m).is_err());

        let mut m = base();
        m.insert("ENCRYPTION_ROUNDS".into(), "many".into());
        assert!(load(&m).is_err());

        let mut m = base();
        m.insert("CSRF_DEFAULT_MAX_USES".into(), "0".into());
        assert!(load(&m).is_err());

        let mut m = base();
        m.insert("CSRF_DEFAULT_MAX_USES".into(), "5".into());
        m.insert("CSRF_MAX_USES_LIMIT".into(), "4".into());
        assert!(load(&m).is_err());

        let mut m = base();
        m.insert("CSRF_TOKEN_TTL_SECS".into(), "0".into());
        assert!(load(&m).is_err());
    }

    #[test]
    fn rounds_above_ceiling_are_rejected() {
        let mut m = base();
        m.insert("ENCRYPTION_ROUNDS".into(), MAX_ROUNDS.to_string());
        assert_eq!(load(&m).unwrap().rounds, MAX_ROUNDS);

        m.insert("ENCRYPTION_ROUNDS".into(), (MAX_ROUNDS + 1).to_string());
        let err = load(&m).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "ENCRYPTION_ROUNDS", .. }));
        assert!(err.to_string().contains("at most 10000"));
    }

    #[test]
    fn debug_output_redacts_key() {
        let cfg = load(&base()).unwrap();
        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains(KEY));
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn from_env_reads_process_environment() {
        temp_env::with_vars(
            vec![
                ("ENCRYPTION_KEY", Some(KEY)),
                ("ENCRYPTION_ROUNDS", Some("2")),
                ("CSRF_ALLOWED_HOST", Some("example.test")),
                ("CSRF_CHECK_ORIGIN", None),
            ],
            || {
                let cfg = CsrfConfig::from_env().unwrap();
                assert_eq!(cfg.rounds, 2);
                assert_eq!(cfg.allowed_host, "example.test");
            },
        );
    }
}
