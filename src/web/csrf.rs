//! # Token Issuance Endpoint
//!
//! `GET /token[?max_uses=N]` generates a fresh session id and CSRF token,
//! records their bound forms in the token store and returns the plaintext
//! pair to the client:
//!
//! ```json
//! {"session_id": "...", "csrf_token": "...", "max_uses": 5}
//! ```
//!
//! `max_uses` is echoed only when the caller asked for a budget; otherwise
//! the configured default applies. The response is never cacheable.
//!
//! Clients send the pair back as `X-Session-ID` / `X-CSRF-Token` (or the
//! legacy `session_id` / `csrf_token`) on mutating requests.

use axum::{
    extract::{Query, State},
    http::{
        header::{CACHE_CONTROL, PRAGMA},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::csrf::token::generate_token;
use crate::web::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct TokenQuery {
    pub max_uses: Option<u32>,
}

/// JSON body returned by [`token_handler`].
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub session_id: String,
    pub csrf_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_uses: Option<u32>,
}

pub async fn token_handler(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
) -> Response {
    let policy = state.issue;
    let max_uses = query.max_uses.unwrap_or(policy.default_max_uses);
    if !(1..=policy.max_uses_limit).contains(&max_uses) {
        debug!(max_uses, limit = policy.max_uses_limit, "max_uses out of range");
        return (
            StatusCode::BAD_REQUEST,
            format!(
                "400 Bad Request: max_uses must be between 1 and {}",
                policy.max_uses_limit
            ),
        )
            .into_response();
    }

    let session_id = generate_token();
    let csrf_token = generate_token();
    if let Err(e) = state
        .vault()
        .issue(&session_id, &csrf_token, policy.ttl, max_uses)
        .await
    {
        error!(error = %e, "failed to issue token pair");
        return (StatusCode::INTERNAL_SERVER_ERROR, "500 Internal Server Error").into_response();
    }

    let mut headers = HeaderMap::new();
    headers.insert(
        CACHE_CONTROL,
        HeaderValue::from_static("no-store, no-cache, must-revalidate"),
    );
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));

    let body = TokenResponse {
        session_id: session_id.into_string(),
        csrf_token: csrf_token.into_string(),
        max_uses: query.max_uses,
    };
    (StatusCode::OK, headers, Json(body)).into_response()
}
