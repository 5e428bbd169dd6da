use thiserror::Error;

/// Startup-time configuration failure.
///
/// Configuration is validated once when the process starts; any of these
/// errors aborts startup instead of falling back to an implicit default.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is absent or blank.
    #[error("{0} is not set")]
    Missing(&'static str),

    /// A variable is present but its value is unusable.
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

impl ConfigError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            name,
            reason: reason.into(),
        }
    }
}
