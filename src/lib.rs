//! # pdf_vault
//!
//! A small HTTP service that stores and serves PDF chapters, with uploads
//! protected by server-side CSRF tokens.
//!
//! - `config`: typed environment configuration, validated at startup
//! - `csrf`: token generation, keyed binding, the token store and the
//!   authorization pipeline
//! - `web`: axum handlers, middleware and router
//! - `telemetry`: `tracing` subscriber setup
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use pdf_vault::csrf::memory_store::InMemoryTokenStore;
//! use pdf_vault::config::csrf::CsrfConfig;
//! use pdf_vault::web::{router::build_router, state::AppState};
//! use pdf_vault::web::upload::local_storage::LocalFileStorage;
//!
//! let cfg = CsrfConfig::from_env_with(|k| match k {
//!     "ENCRYPTION_KEY" => Some("0123456789abcdef0123456789abcdef".into()),
//!     "ENCRYPTION_ROUNDS" => Some("3".into()),
//!     "CSRF_ALLOWED_HOST" => Some("localhost:8003".into()),
//!     _ => None,
//! })
//! .unwrap();
//!
//! let state = AppState::new(
//!     &cfg,
//!     Arc::new(InMemoryTokenStore::default()),
//!     Arc::new(LocalFileStorage::new("PDF")),
//! )
//! .unwrap();
//! let _app = build_router(state, 5 * 1024 * 1024);
//! ```

// ===============================
// Re-exports of external crates
// ===============================

pub use anyhow;
pub use axum;
pub use chrono;
pub use redis;
pub use serde;
pub use serde_json;
pub use tokio;
pub use tower;
pub use tower_http;

// ===============================
// Public modules
// ===============================
pub mod config;
pub mod csrf;
pub mod error;
pub mod telemetry;
pub mod time;
pub mod web;
