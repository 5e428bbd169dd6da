//! # Redis Token Store
//!
//! [`TokenStore`] backed by a shared Redis instance.
//!
//! - `put` writes both entries in one `MULTI`/`EXEC` pipeline with `SET … EX`,
//!   so they share a TTL and appear together.
//! - `get` reads both entries in one round trip.
//! - `decrement` runs a Lua script that checks and decrements in a single
//!   server-side step. A plain `GET` followed by `SET` would let two
//!   concurrent requests both spend the last use.
//!
//! [`ConnectionManager`] multiplexes one connection, reconnects on failure and
//! is cheap to clone, so each call clones it instead of taking a lock.
//!
//! # Example
//! ```rust,no_run
//! use pdf_vault::config::redis::RedisConfig;
//! use pdf_vault::csrf::redis_store::RedisTokenStore;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = RedisConfig { url: "redis://127.0.0.1/".into() };
//! let store = RedisTokenStore::connect(&cfg).await?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use redis::{aio::ConnectionManager, Script};
use tracing::info;

use super::binding::BoundValue;
use super::store::{csrf_key, uses_key, SessionRecord, StoreError, TokenStore};
use crate::config::redis::RedisConfig;

/// Decrements `KEYS[1]` only if it exists and is positive.
/// Returns the new value, or -1 when nothing was consumed.
const CONSUME_SCRIPT: &str = r"
local remaining = tonumber(redis.call('GET', KEYS[1]))
if remaining == nil or remaining <= 0 then
    return -1
end
return redis.call('DECR', KEYS[1])
";

/// Redis-backed token store.
#[derive(Clone)]
pub struct RedisTokenStore {
    conn: ConnectionManager,
    consume: Script,
}

impl RedisTokenStore {
    /// Opens a managed connection to the configured Redis instance.
    ///
    /// # Errors
    /// [`StoreError::Unavailable`] if the URL is invalid or the server cannot
    /// be reached.
    pub async fn connect(cfg: &RedisConfig) -> Result<Self, StoreError> {
        let client = redis::Client::open(cfg.url.as_str())?;
        let conn = ConnectionManager::new(client).await?;
        info!("connected to token store");
        Ok(Self::with_connection(conn))
    }

    pub fn with_connection(conn: ConnectionManager) -> Self {
        Self {
            conn,
            consume: Script::new(CONSUME_SCRIPT),
        }
    }
}

/// Redis `EX` needs whole seconds, at least one.
fn ttl_secs(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

fn to_remaining(raw: Option<i64>) -> Result<u32, StoreError> {
    let n = raw.unwrap_or(0).max(0);
    u32::try_from(n).map_err(|_| StoreError::Malformed(format!("use counter out of range: {n}")))
}

#[async_trait]
impl TokenStore for RedisTokenStore {
    async fn put(
        &self,
        bound_session: &BoundValue,
        bound_csrf: &BoundValue,
        remaining_uses: u32,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let secs = ttl_secs(ttl);
        let mut conn = self.conn.clone();
        redis::pipe()
            .atomic()
            .set_ex(csrf_key(bound_session), bound_csrf.as_str(), secs)
            .ignore()
            .set_ex(uses_key(bound_session), remaining_uses, secs)
            .ignore()
            .query_async::<()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn get(&self, bound_session: &BoundValue) -> Result<Option<SessionRecord>, StoreError> {
        let mut conn = self.conn.clone();
        let (expected, uses): (Option<String>, Option<i64>) = redis::pipe()
            .get(csrf_key(bound_session))
            .get(uses_key(bound_session))
            .query_async(&mut conn)
            .await?;

        let Some(expected_csrf) = expected else {
            return Ok(None);
        };
        Ok(Some(SessionRecord {
            expected_csrf,
            remaining_uses: to_remaining(uses)?,
        }))
    }

    async fn decrement(&self, bound_session: &BoundValue) -> Result<Option<u32>, StoreError> {
        let mut conn = self.conn.clone();
        let left: i64 = self
            .consume
            .key(uses_key(bound_session))
            .invoke_async(&mut conn)
            .await?;
        if left < 0 {
            return Ok(None);
        }
        to_remaining(Some(left)).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_is_rounded_to_at_least_one_second() {
        assert_eq!(ttl_secs(Duration::from_secs(3600)), 3600);
        assert_eq!(ttl_secs(Duration::from_millis(1500)), 1);
        assert_eq!(ttl_secs(Duration::from_millis(10)), 1);
    }

    #[test]
    fn missing_or_negative_counter_reads_as_exhausted() {
        assert_eq!(to_remaining(None).unwrap(), 0);
        assert_eq!(to_remaining(Some(-3)).unwrap(), 0);
        assert_eq!(to_remaining(Some(7)).unwrap(), 7);
        assert!(to_remaining(Some(i64::from(u32::MAX) + 1)).is_err());
    }

    #[test]
    fn consume_script_never_creates_or_underflows_counter() {
        assert!(CONSUME_SCRIPT.contains("remaining == nil or remaining <= 0"));
        assert!(CONSUME_SCRIPT.contains("DECR"));
        assert!(!CONSUME_SCRIPT.contains("SET"));
    }

    /// Live-server tests. Run with `REDIS_URL=redis://127.0.0.1/ cargo test -- --ignored`.
    mod live {
        use super::*;
        use crate::csrf::token::generate_token;

        async fn store() -> RedisTokenStore {
            let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1/".into());
            RedisTokenStore::connect(&RedisConfig { url }).await.unwrap()
        }

        fn fresh() -> BoundValue {
            BoundValue::from(format!("test-{}", hex::encode(generate_token().as_str())))
        }

        #[tokio::test]
        #[ignore]
        async fn put_get_decrement_roundtrip() {
            let store = store().await;
            let s = fresh();
            let c = BoundValue::from("expected".to_string());

            store.put(&s, &c, 2, Duration::from_secs(30)).await.unwrap();
            let rec = store.get(&s).await.unwrap().unwrap();
            assert_eq!(rec.expected_csrf, "expected");
            assert_eq!(rec.remaining_uses, 2);

            assert_eq!(store.decrement(&s).await.unwrap(), Some(1));
            assert_eq!(store.decrement(&s).await.unwrap(), Some(0));
            assert_eq!(store.decrement(&s).await.unwrap(), None);
        }

        #[tokio::test]
        #[ignore]
        async fn decrement_on_unknown_key_creates_nothing() {
            let store = store().await;
            let s = fresh();
            assert_eq!(store.decrement(&s).await.unwrap(), None);
            assert!(store.get(&s).await.unwrap().is_none());
        }

        #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
        #[ignore]
        async fn concurrent_decrements_spend_budget_once() {
            let store = store().await;
            let s = fresh();
            store
                .put(&s, &BoundValue::from("c".to_string()), 1, Duration::from_secs(30))
                .await
                .unwrap();

            let tasks = (0..20).map(|_| {
                let store = store.clone();
                let s = s.clone();
                tokio::spawn(async move { store.decrement(&s).await.unwrap() })
            });
            let wins = futures::future::join_all(tasks)
                .await
                .into_iter()
                .filter(|r| matches!(r, Ok(Some(_))))
                .count();
            assert_eq!(wins, 1);
        }
    }
}
