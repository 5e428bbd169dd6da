//! # Local File Storage
//!
//! [`FileStorage`] on the local filesystem, rooted at a configured directory
//! (`PDF_ROOT`).
//!
//! - parent directories are created on save
//! - leading slashes are trimmed and `..` is neutralised, so every key stays
//!   under the root
//!
//! # Example
//! ```rust,no_run
//! use pdf_vault::web::upload::local_storage::LocalFileStorage;
//! use pdf_vault::web::upload::storage::FileStorage;
//!
//! let storage = LocalFileStorage::new("/tmp/pdf");
//! storage.save("alice/book/1.pdf", b"%PDF-1.7").unwrap();
//! assert_eq!(storage.load("alice/book/1.pdf").unwrap(), b"%PDF-1.7");
//! ```

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use super::storage::FileStorage;
use crate::error::entity::NotFoundError;

/// Stores chapters under a root directory.
#[derive(Clone, Debug)]
pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    /// # Example
    /// ```
    /// use pdf_vault::web::upload::local_storage::LocalFileStorage;
    ///
    /// let storage = LocalFileStorage::new("/tmp/data");
    /// assert_eq!(storage.root().to_str().unwrap(), "/tmp/data");
    /// ```
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Returns the configured root path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, rel_path: &str) -> PathBuf {
        let safe = rel_path.trim_start_matches('/').replace("..", "_");
        self.root.join(safe)
    }
}

impl FileStorage for LocalFileStorage {
    fn save(&self, rel_path: &str, bytes: &[u8]) -> Result<String> {
        let full = self.resolve(rel_path);
        if let Some(dir) = full.parent() {
            fs::create_dir_all(dir).with_context(|| format!("create {dir:?}"))?;
        }
        fs::write(&full, bytes).with_context(|| format!("write {full:?}"))?;
        Ok(full.to_string_lossy().into_owned())
    }

    fn load(&self, rel_path: &str) -> Result<Vec<u8>> {
        let full = self.resolve(rel_path);
        match fs::read(&full) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(NotFoundError::new("Chapter").into()),
            Err(e) => Err(e).with_context(|| format!("read {full:?}")),
        }
    }
}
