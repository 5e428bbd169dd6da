//! # File Storage Abstractions
//!
//! The port through which chapter PDFs are written and read.
//!
//! Keys are relative paths such as `alice/my-book/3.pdf`; the backend decides
//! where they live. A missing file is reported as
//! [`NotFoundError`](crate::error::entity::NotFoundError) inside the
//! [`anyhow::Error`], so callers can tell "absent" from "broken" with
//! `downcast_ref`.
//!
//! # Example
//! ```rust
//! use pdf_vault::web::upload::storage::FileStorage;
//! use pdf_vault::error::entity::NotFoundError;
//! use anyhow::Result;
//! use std::{collections::HashMap, sync::Mutex};
//!
//! #[derive(Default)]
//! struct MemoryStorage(Mutex<HashMap<String, Vec<u8>>>);
//!
//! impl FileStorage for MemoryStorage {
//!     fn save(&self, rel_path: &str, bytes: &[u8]) -> Result<String> {
//!         self.0.lock().unwrap().insert(rel_path.into(), bytes.to_vec());
//!         Ok(rel_path.into())
//!     }
//!     fn load(&self, rel_path: &str) -> Result<Vec<u8>> {
//!         self.0.lock().unwrap().get(rel_path).cloned()
//!             .ok_or_else(|| NotFoundError::new("Chapter").into())
//!     }
//! }
//!
//! let storage = MemoryStorage::default();
//! storage.save("a/b/1.pdf", b"%PDF").unwrap();
//! assert_eq!(storage.load("a/b/1.pdf").unwrap(), b"%PDF");
//! assert!(storage.load("a/b/2.pdf").unwrap_err().downcast_ref::<NotFoundError>().is_some());
//! ```

use anyhow::Result;

/// A chapter storage backend.
///
/// Calls are blocking; async callers should run them on a blocking thread.
pub trait FileStorage: Send + Sync {
    /// Writes `bytes` at `rel_path`, replacing any previous content.
    ///
    /// # Returns
    /// Where the file ended up (backend-specific).
    fn save(&self, rel_path: &str, bytes: &[u8]) -> Result<String>;

    /// Reads the file at `rel_path`.
    ///
    /// # Errors
    /// [`NotFoundError`](crate::error::entity::NotFoundError) when nothing is
    /// stored there; any other error for I/O failures.
    fn load(&self, rel_path: &str) -> Result<Vec<u8>>;
}
