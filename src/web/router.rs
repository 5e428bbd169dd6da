//! # HTTP Router
//!
//! | Route | Guard |
//! |-------|-------|
//! | `GET /` | none |
//! | `GET /token` | host / origin |
//! | `GET /PDF/{username}/{slug}/{chapter}` | host / origin |
//! | `POST /PDF/{username}/{slug}/{chapter}` | full CSRF pipeline |
//! | anything else | `404 Not Found` |
//!
//! The guard is attached with `route_layer`, so it only runs for matched
//! routes; unknown paths fall through to the 404 handler untouched.

use axum::{extract::DefaultBodyLimit, middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::web::{
    csrf::token_handler,
    fallback::{hello, not_found},
    middleware::require_csrf,
    state::AppState,
    upload::pdf_handler::{download_chapter, upload_chapter},
};

pub fn build_router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/token", get(token_handler))
        .route(
            "/PDF/{username}/{slug}/{chapter}",
            get(download_chapter).post(upload_chapter),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_csrf))
        .route("/", get(hello))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
