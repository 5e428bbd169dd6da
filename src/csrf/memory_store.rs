//! # In-Memory Token Store
//!
//! A process-local [`TokenStore`] for tests and single-instance development.
//!
//! Expiry is evaluated against an injected [`Clock`]. An expired record is
//! dropped when its key is touched, and every `put` sweeps all expired
//! records, so the map only grows with live pairs. Every operation runs under one short-lived
//! mutex, which makes `decrement` atomic with respect to concurrent callers.
//! The lock is never held across an `.await`.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};

use super::binding::BoundValue;
use super::store::{SessionRecord, StoreError, TokenStore};
use crate::time::{clock::Clock, system_clock::SystemClock};

#[derive(Debug)]
struct Entry {
    expected_csrf: String,
    remaining_uses: u32,
    expires_at: DateTime<Utc>,
}

/// Process-local token store.
pub struct InMemoryTokenStore {
    entries: Mutex<HashMap<String, Entry>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryTokenStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Number of live (unexpired) records.
    pub fn len(&self) -> usize {
        let now = self.clock.now();
        self.lock()
            .map(|m| m.values().filter(|e| e.expires_at > now).count())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Entry>>, StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".into()))
    }

    /// Returns the live entry for `key`, removing it if it has expired.
    fn live<'a>(
        map: &'a mut HashMap<String, Entry>,
        key: &str,
        now: DateTime<Utc>,
    ) -> Option<&'a mut Entry> {
        if map.get(key).is_some_and(|e| e.expires_at <= now) {
            map.remove(key);
        }
        map.get_mut(key)
    }
}

impl Default for InMemoryTokenStore {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn put(
        &self,
        bound_session: &BoundValue,
        bound_csrf: &BoundValue,
        remaining_uses: u32,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let now = self.clock.now();
        let expires_at = TimeDelta::from_std(ttl)
            .ok()
            .and_then(|d| now.checked_add_signed(d))
            .ok_or_else(|| StoreError::Malformed(format!("ttl out of range: {ttl:?}")))?;

        let mut map = self.lock()?;
        map.retain(|_, e| e.expires_at > now);
        map.insert(
            bound_session.as_str().to_string(),
            Entry {
                expected_csrf: bound_csrf.as_str().to_string(),
                remaining_uses,
                expires_at,
            },
        );
        Ok(())
    }

    async fn get(&self, bound_session: &BoundValue) -> Result<Option<SessionRecord>, StoreError> {
        let now = self.clock.now();
        let mut map = self.lock()?;
        Ok(
            Self::live(&mut map, bound_session.as_str(), now).map(|e| SessionRecord {
                expected_csrf: e.expected_csrf.clone(),
                remaining_uses: e.remaining_uses,
            }),
        )
    }

    async fn decrement(&self, bound_session: &BoundValue) -> Result<Option<u32>, StoreError> {
        let now = self.clock.now();
        let mut map = self.lock()?;
        let Some(entry) = Self::live(&mut map, bound_session.as_str(), now) else {
            return Ok(None);
        };
        if entry.remaining_uses == 0 {
            return Ok(None);
        }
        entry.remaining_uses -= 1;
        Ok(Some(entry.remaining_uses))
    }
}
