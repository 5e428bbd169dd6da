//! # Environment Variable Utilities
//!
//! Helpers for reading environment variables with type conversions.
//!
//! Every helper has a `*_from` variant that takes a provider closure instead of
//! reading the process environment, so configuration structs can be tested
//! without touching global state.
//!
//! # Examples
//! ```rust
//! use pdf_vault::config::env::{read_flag_from, read_parsed_from, require_from};
//!
//! let get = |k: &str| match k {
//!     "CSRF_CHECK_ORIGIN" => Some("yes".to_string()),
//!     "ENCRYPTION_ROUNDS" => Some("4".to_string()),
//!     _ => None,
//! };
//!
//! assert!(read_flag_from(&get, "CSRF_CHECK_ORIGIN", false));
//! assert_eq!(read_parsed_from::<u32, _>(&get, "ENCRYPTION_ROUNDS").unwrap(), Some(4));
//! assert!(require_from(&get, "REDIS_URL").is_err());
//! ```

use std::str::FromStr;

use super::error::ConfigError;

/// Reads a boolean flag.
///
/// `"1"`, `"true"`, `"yes"` and `"on"` (any case, quotes stripped) are true;
/// anything else present is false.
pub fn read_flag_from<F>(provider: F, name: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    match provider(name) {
        Some(v) => {
            let s = unquote(&v);
            matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
        }
        None => default,
    }
}

/// Reads a required, non-empty variable.
///
/// # Errors
/// [`ConfigError::Missing`] if the variable is absent or blank.
pub fn require_from<F>(provider: F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    provider(name)
        .map(|v| unquote(&v).to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(name))
}

/// Parses an optional variable.
///
/// A missing or blank variable yields `Ok(None)`; a present value that does not
/// parse is an error rather than a silent fallback.
///
/// # Errors
/// [`ConfigError::Invalid`] if the value cannot be parsed as `T`.
pub fn read_parsed_from<T, F>(provider: F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = provider(name) else {
        return Ok(None);
    };
    let s = unquote(&raw);
    if s.is_empty() {
        return Ok(None);
    }
    s.parse::<T>()
        .map(Some)
        .map_err(|e| ConfigError::invalid(name, e.to_string()))
}

fn unquote(v: &str) -> &str {
    v.trim().trim_matches(|c| c == '"' || c == '\'')
}
