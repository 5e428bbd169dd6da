//! # Token Store Port
//!
//! Abstract interface over the shared, TTL-capable key-value store that owns
//! session records.
//!
//! All keys passed to a [`TokenStore`] are already bound (see
//! [`crate::csrf::binding`]); plaintext tokens never reach the store.
//!
//! A session record is two entries sharing one TTL:
//!
//! | Key | Value |
//! |-----|-------|
//! | `csrf_token:<bound_session_id>` | bound CSRF token |
//! | `token_uses:<bound_session_id>` | remaining uses |
//!
//! Implementations:
//! - [`RedisTokenStore`](super::redis_store::RedisTokenStore) for deployments
//! - [`InMemoryTokenStore`](super::memory_store::InMemoryTokenStore) for tests
//!   and single-process use

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use super::binding::BoundValue;

pub const CSRF_KEY_PREFIX: &str = "csrf_token";
pub const USES_KEY_PREFIX: &str = "token_uses";

/// Store key of the expected CSRF binding.
pub fn csrf_key(bound_session: &BoundValue) -> String {
    format!("{CSRF_KEY_PREFIX}:{}", bound_session.as_str())
}

/// Store key of the remaining-uses counter.
pub fn uses_key(bound_session: &BoundValue) -> String {
    format!("{USES_KEY_PREFIX}:{}", bound_session.as_str())
}

/// What the store holds for one bound session id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionRecord {
    /// Bound form of the CSRF token issued with the session id.
    pub expected_csrf: String,
    /// Successful validations left. `0` means exhausted.
    pub remaining_uses: u32,
}

impl SessionRecord {
    pub fn is_exhausted(&self) -> bool {
        self.remaining_uses == 0
    }
}

/// The store could not be reached or answered nonsense.
///
/// Never interpreted as "token invalid".
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("token store unavailable: {0}")]
    Unavailable(String),

    #[error("token store returned malformed data: {0}")]
    Malformed(String),
}

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        Self::Unavailable(err.to_string())
    }
}

/// Shared session record storage.
///
/// Implementations must be safe for concurrent use from many request tasks.
#[async_trait]
pub trait TokenStore: Send + Sync + 'static {
    /// Writes both entries of a record with the same TTL, as one unit.
    /// Overwrites any existing record for the same key.
    async fn put(
        &self,
        bound_session: &BoundValue,
        bound_csrf: &BoundValue,
        remaining_uses: u32,
        ttl: Duration,
    ) -> Result<(), StoreError>;

    /// Reads a record. `None` means unknown or expired.
    ///
    /// A record whose counter entry is missing is reported with
    /// `remaining_uses == 0`.
    async fn get(&self, bound_session: &BoundValue) -> Result<Option<SessionRecord>, StoreError>;

    /// Atomically decrements the counter if it is above zero.
    ///
    /// Returns the new remaining count, or `None` when there was nothing to
    /// consume (missing, expired or already at zero). Never creates a counter.
    async fn decrement(&self, bound_session: &BoundValue) -> Result<Option<u32>, StoreError>;
}
