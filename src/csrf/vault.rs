//! # Token Vault
//!
//! Binds tokens and talks to the [`TokenStore`]. This is the only place that
//! turns plaintext tokens into store keys, so issuance and validation always
//! use the same binder.
//!
//! # Example
//! ```rust
//! use std::{sync::Arc, time::Duration};
//! use pdf_vault::csrf::{
//!     binding::Binder, memory_store::InMemoryTokenStore, token::generate_token, vault::TokenVault,
//! };
//!
//! # tokio_test_block(async {
//! let binder = Binder::new(*b"0123456789abcdef0123456789abcdef", 2).unwrap();
//! let vault = TokenVault::new(binder, Arc::new(InMemoryTokenStore::default()));
//!
//! let (session, csrf) = (generate_token(), generate_token());
//! vault.issue(&session, &csrf, Duration::from_secs(60), 1).await.unwrap();
//!
//! let bound = vault.bind(session.as_str()).unwrap();
//! assert_eq!(vault.lookup(&bound).await.unwrap().unwrap().remaining_uses, 1);
//! assert_eq!(vault.consume(&bound).await.unwrap(), Some(0));
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

use std::{sync::Arc, time::Duration};

use thiserror::Error;
use tracing::debug;

use super::binding::{BindError, Binder, BoundValue};
use super::store::{SessionRecord, StoreError, TokenStore};
use super::token::Token;

/// Failure while issuing a token pair.
#[derive(Debug, Error)]
pub enum IssueError {
    #[error(transparent)]
    Bind(#[from] BindError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Clone)]
pub struct TokenVault {
    binder: Binder,
    store: Arc<dyn TokenStore>,
}

impl TokenVault {
    pub fn new(binder: Binder, store: Arc<dyn TokenStore>) -> Self {
        Self { binder, store }
    }

    /// Binds a token with this vault's key and round count.
    pub fn bind(&self, token: &str) -> Result<BoundValue, BindError> {
        self.binder.bind(token)
    }

    /// Records a freshly generated token pair.
    ///
    /// Both tokens are bound; the record is keyed by the bound session id and
    /// holds the bound CSRF token plus `max_uses`, all expiring after `ttl`.
    pub async fn issue(
        &self,
        session_id: &Token,
        csrf_token: &Token,
        ttl: Duration,
        max_uses: u32,
    ) -> Result<BoundValue, IssueError> {
        let bound_session = self.binder.bind(session_id.as_str())?;
        let bound_csrf = self.binder.bind(csrf_token.as_str())?;
        self.store
            .put(&bound_session, &bound_csrf, max_uses, ttl)
            .await?;
        debug!(session = ?bound_session, max_uses, ttl_secs = ttl.as_secs(), "token pair issued");
        Ok(bound_session)
    }

    /// `None` means unknown or expired.
    pub async fn lookup(
        &self,
        bound_session: &BoundValue,
    ) -> Result<Option<SessionRecord>, StoreError> {
        self.store.get(bound_session).await
    }

    /// Spends one use. `None` when no use was left to spend.
    pub async fn consume(&self, bound_session: &BoundValue) -> Result<Option<u32>, StoreError> {
        self.store.decrement(bound_session).await
    }
}
