//! # Shared Handler State
//!
//! Everything the handlers and the CSRF middleware need, built once at
//! startup and cloned into each request.

use std::{sync::Arc, time::Duration};

use crate::config::csrf::CsrfConfig;
use crate::csrf::{
    binding::{BindError, Binder},
    guard::{CsrfGuard, GuardPolicy},
    store::TokenStore,
    vault::TokenVault,
};
use crate::web::upload::storage::FileStorage;

/// How `GET /token` issues token pairs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IssuePolicy {
    pub ttl: Duration,
    /// Budget when the caller does not ask for one.
    pub default_max_uses: u32,
    /// Largest budget a caller may ask for.
    pub max_uses_limit: u32,
}

impl From<&CsrfConfig> for IssuePolicy {
    fn from(cfg: &CsrfConfig) -> Self {
        Self {
            ttl: cfg.token_ttl,
            default_max_uses: cfg.default_max_uses,
            max_uses_limit: cfg.max_uses_limit,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub guard: Arc<CsrfGuard>,
    pub storage: Arc<dyn FileStorage>,
    pub issue: IssuePolicy,
}

impl AppState {
    /// Wires the binder, vault and guard from validated configuration.
    ///
    /// # Errors
    /// [`BindError::InvalidRounds`] if `cfg.rounds` is zero.
    pub fn new(
        cfg: &CsrfConfig,
        store: Arc<dyn TokenStore>,
        storage: Arc<dyn FileStorage>,
    ) -> Result<Self, BindError> {
        let binder = Binder::new(cfg.encryption_key.clone(), cfg.rounds)?;
        let vault = TokenVault::new(binder, store);
        Ok(Self {
            guard: Arc::new(CsrfGuard::new(vault, GuardPolicy::from(cfg))),
            storage,
            issue: IssuePolicy::from(cfg),
        })
    }

    pub fn vault(&self) -> &TokenVault {
        self.guard.vault()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::csrf::memory_store::InMemoryTokenStore;
    use crate::error::entity::NotFoundError;
    use std::{collections::HashMap, sync::Mutex};

    pub(crate) const HOST: &str = "files.example.com";
    pub(crate) const ORIGIN: &str = "https://app.example.com";

    pub(crate) fn csrf_config(check_origin: bool) -> CsrfConfig {
        CsrfConfig {
            encryption_key: b"0123456789abcdef0123456789abcdef".to_vec(),
            rounds: 2,
            allowed_host: HOST.into(),
            allowed_origin: Some(ORIGIN.into()),
            check_origin,
            token_ttl: Duration::from_secs(3600),
            default_max_uses: 1,
            max_uses_limit: 100,
        }
    }

    /// In-memory chapters keyed by storage key.
    #[derive(Default)]
    pub(crate) struct MemoryStorage {
        pub(crate) files: Mutex<HashMap<String, Vec<u8>>>,
        pub(crate) fail_writes: bool,
    }

    impl FileStorage for MemoryStorage {
        fn save(&self, rel_path: &str, bytes: &[u8]) -> anyhow::Result<String> {
            if self.fail_writes {
                anyhow::bail!("disk full");
            }
            self.files
                .lock()
                .unwrap()
                .insert(rel_path.to_string(), bytes.to_vec());
            Ok(rel_path.to_string())
        }

        fn load(&self, rel_path: &str) -> anyhow::Result<Vec<u8>> {
            self.files
                .lock()
                .unwrap()
                .get(rel_path)
                .cloned()
                .ok_or_else(|| NotFoundError::new("Chapter").into())
        }
    }

    pub(crate) fn test_state_with(check_origin: bool, storage: Arc<MemoryStorage>) -> AppState {
        AppState::new(
            &csrf_config(check_origin),
            Arc::new(InMemoryTokenStore::default()),
            storage,
        )
        .unwrap()
    }

    pub(crate) fn test_state() -> AppState {
        test_state_with(false, Arc::new(MemoryStorage::default()))
    }

    #[test]
    fn state_carries_policies_from_config() {
        let state = test_state();
        assert_eq!(state.issue.ttl, Duration::from_secs(3600));
        assert_eq!(state.issue.default_max_uses, 1);
        assert_eq!(state.issue.max_uses_limit, 100);
        assert_eq!(state.guard.policy().allowed_host, HOST);
        assert!(!state.guard.policy().check_origin);
    }

    #[test]
    fn zero_rounds_is_rejected() {
        let mut cfg = csrf_config(false);
        cfg.rounds = 0;
        let res = AppState::new(
            &cfg,
            Arc::new(InMemoryTokenStore::default()),
            Arc::new(MemoryStorage::default()),
        );
        assert!(matches!(res, Err(BindError::InvalidRounds)));
    }

    #[tokio::test]
    async fn vault_is_shared_with_guard() {
        let state = test_state();
        let bound = state.vault().bind("abc").unwrap();
        assert_eq!(bound, state.guard.vault().bind("abc").unwrap());
    }
}
