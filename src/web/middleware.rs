//! # CSRF Middleware
//!
//! Runs [`CsrfGuard::authorize`](crate::csrf::guard::CsrfGuard::authorize)
//! before the wrapped handlers. On success the
//! [`Authorized`](crate::csrf::guard::Authorized) outcome is put into the
//! request extensions; on failure the guard's error response is returned and
//! the handler never runs.
//!
//! # Example
//! ```rust,ignore
//! use axum::{middleware, routing::post, Router};
//! use pdf_vault::web::middleware::require_csrf;
//!
//! let app = Router::new()
//!     .route("/PDF/{username}/{slug}/{chapter}", post(handler))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), require_csrf))
//!     .with_state(state);
//! ```

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::csrf::guard::CsrfRequest;
use crate::web::state::AppState;

pub async fn require_csrf(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let csrf_req = CsrfRequest::from_parts(req.method(), req.uri(), req.headers());
    match state.guard.authorize(&csrf_req).await {
        Ok(authorized) => {
            req.extensions_mut().insert(authorized);
            next.run(req).await
        }
        Err(e) => e.into_response(),
    }
}
