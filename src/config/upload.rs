//! # Chapter Storage Configuration
//!
//! Root directory under which uploaded PDF chapters are written and from
//! which they are served.
//!
//! Reads `PDF_ROOT` (default: `PDF`, relative to the working directory).
//!
//! # Example
//! ```rust
//! use pdf_vault::config::upload::UploadConfig;
//! use std::path::PathBuf;
//!
//! let cfg = UploadConfig::from_env_with(|_| None);
//! assert_eq!(cfg.root, PathBuf::from("PDF"));
//! ```
use std::path::PathBuf;

pub const DEFAULT_PDF_ROOT: &str = "PDF";

/// Configuration for the chapter storage directory.
#[derive(Clone, Debug, PartialEq)]
pub struct UploadConfig {
    /// Root directory where all chapters are stored.
    pub root: PathBuf,
}

impl UploadConfig {
    pub fn from_env() -> Self {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    pub fn from_env_with<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let root = get("PDF_ROOT")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_PDF_ROOT.to_string());
        Self {
            root: PathBuf::from(root),
        }
    }
}
