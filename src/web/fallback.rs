use axum::{http::StatusCode, response::IntoResponse};

/// Final fallback of the router: `404 Not Found` with a fixed body.
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "404 Not Found")
}

/// Liveness probe on `/`. Not guarded.
pub async fn hello() -> &'static str {
    "Hello, World!"
}
