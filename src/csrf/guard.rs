//! # Authorization Pipeline
//!
//! The per-request CSRF gate. [`CsrfGuard::authorize`] evaluates, in order,
//! stopping at the first failure:
//!
//! 1. `Host` equals the allowed host → else **403**
//! 2. `Origin` equals the allowed origin, when origin checking is on → else **403**
//! 3. session id and CSRF token headers are non-empty → else **400**
//! 4. both values are exactly [`TOKEN_LEN`] bytes, the bound session id has a
//!    record and the bound CSRF token matches it → else **401**
//! 5. the record has uses left → else **401**
//! 6. one use is spent atomically in the store → else **401** (lost a race)
//!
//! Safe methods (`GET`, `HEAD`, `OPTIONS`) stop after step 2. For them a
//! missing `Origin` is accepted, since browsers omit it on same-origin
//! navigation; a present one must still match.
//!
//! Store and cipher failures become **500** and are never reported as an
//! invalid token. Response bodies are fixed strings: an unknown session, an
//! expired one and an exhausted one all look the same to the caller.

use axum::{
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{debug, error, warn};

use super::binding::BindError;
use super::store::StoreError;
use super::token::TOKEN_LEN;
use super::vault::TokenVault;
use crate::config::csrf::CsrfConfig;

pub const SESSION_HEADER: &str = "x-session-id";
pub const SESSION_HEADER_LEGACY: &str = "session_id";
pub const CSRF_HEADER: &str = "x-csrf-token";
pub const CSRF_HEADER_LEGACY: &str = "csrf_token";

/// Client-caused rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("host or origin not allowed")]
    Forbidden,
    #[error("session id or CSRF token missing")]
    BadRequest,
    #[error("CSRF token invalid, expired or exhausted")]
    Unauthorized,
}

/// Server-side failure while validating.
#[derive(Debug, Error)]
pub enum InfrastructureFailure {
    #[error(transparent)]
    StoreUnavailable(#[from] StoreError),
    #[error(transparent)]
    CryptoInitFailure(#[from] BindError),
}

/// Outcome of a failed [`CsrfGuard::authorize`].
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Rejected(#[from] ValidationFailure),
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureFailure),
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        Self::Infrastructure(e.into())
    }
}

impl From<BindError> for AuthError {
    fn from(e: BindError) -> Self {
        Self::Infrastructure(e.into())
    }
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Rejected(ValidationFailure::Forbidden) => StatusCode::FORBIDDEN,
            Self::Rejected(ValidationFailure::BadRequest) => StatusCode::BAD_REQUEST,
            Self::Rejected(ValidationFailure::Unauthorized) => StatusCode::UNAUTHORIZED,
            Self::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The fixed body sent to the client.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::Rejected(ValidationFailure::Forbidden) => "403 Forbidden: request origin is not allowed",
            Self::Rejected(ValidationFailure::BadRequest) => {
                "400 Bad Request: session id and CSRF token are required"
            }
            Self::Rejected(ValidationFailure::Unauthorized) => {
                "401 Unauthorized: CSRF token is invalid or expired"
            }
            Self::Infrastructure(_) => "500 Internal Server Error",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            Self::Rejected(reason) => warn!(status = %self.status(), %reason, "request rejected"),
            Self::Infrastructure(cause) => error!(error = %cause, "CSRF validation failed"),
        }
        (self.status(), self.public_message()).into_response()
    }
}

/// The parts of a request the guard looks at.
#[derive(Clone, Debug, Default)]
pub struct CsrfRequest {
    pub method: Method,
    pub host: Option<String>,
    pub origin: Option<String>,
    pub session_id: Option<String>,
    pub csrf_token: Option<String>,
}

impl CsrfRequest {
    /// Extracts guard inputs from request parts.
    ///
    /// `X-Session-ID` / `X-CSRF-Token` win over the legacy `session_id` /
    /// `csrf_token` names. `Host` falls back to the URI authority (HTTP/2).
    /// Values that are not valid UTF-8 count as absent.
    pub fn from_parts(method: &Method, uri: &Uri, headers: &HeaderMap) -> Self {
        let host = header_str(headers, header::HOST.as_str())
            .or_else(|| uri.authority().map(|a| a.as_str().to_string()));
        Self {
            method: method.clone(),
            host,
            origin: header_str(headers, header::ORIGIN.as_str()),
            session_id: header_str(headers, SESSION_HEADER)
                .or_else(|| header_str(headers, SESSION_HEADER_LEGACY)),
            csrf_token: header_str(headers, CSRF_HEADER)
                .or_else(|| header_str(headers, CSRF_HEADER_LEGACY)),
        }
    }
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn is_safe(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Host and origin policy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuardPolicy {
    pub allowed_host: String,
    pub allowed_origin: Option<String>,
    pub check_origin: bool,
}

impl From<&CsrfConfig> for GuardPolicy {
    fn from(cfg: &CsrfConfig) -> Self {
        Self {
            allowed_host: cfg.allowed_host.clone(),
            allowed_origin: cfg.allowed_origin.clone(),
            check_origin: cfg.check_origin,
        }
    }
}

/// Successful authorization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Authorized {
    /// Safe method; only host/origin were checked.
    ReadOnly,
    /// One use was spent; this many remain.
    Consumed { remaining_uses: u32 },
}

/// Runs the validation pipeline against the token vault.
#[derive(Clone)]
pub struct CsrfGuard {
    vault: TokenVault,
    policy: GuardPolicy,
}

impl CsrfGuard {
    pub fn new(vault: TokenVault, policy: GuardPolicy) -> Self {
        Self { vault, policy }
    }

    pub fn vault(&self) -> &TokenVault {
        &self.vault
    }

    pub fn policy(&self) -> &GuardPolicy {
        &self.policy
    }

    /// Evaluates the pipeline once. Nothing is retried.
    ///
    /// # Errors
    /// [`AuthError`] describing the first failed step.
    pub async fn authorize(&self, req: &CsrfRequest) -> Result<Authorized, AuthError> {
        self.check_host(req)?;
        self.check_origin(req)?;

        if is_safe(&req.method) {
            return Ok(Authorized::ReadOnly);
        }

        let (Some(session_id), Some(csrf_token)) =
            (req.session_id.as_deref(), req.csrf_token.as_deref())
        else {
            return Err(ValidationFailure::BadRequest.into());
        };

        // issued values are always TOKEN_LEN; anything else was never issued
        if session_id.len() != TOKEN_LEN || csrf_token.len() != TOKEN_LEN {
            debug!(
                session_len = session_id.len(),
                csrf_len = csrf_token.len(),
                "token header of wrong length"
            );
            return Err(ValidationFailure::Unauthorized.into());
        }

        let bound_session = self.vault.bind(session_id)?;
        let Some(record) = self.vault.lookup(&bound_session).await? else {
            debug!(session = ?bound_session, "unknown or expired session");
            return Err(ValidationFailure::Unauthorized.into());
        };

        let bound_csrf = self.vault.bind(csrf_token)?;
        if !bound_csrf.ct_eq(&record.expected_csrf) {
            debug!(session = ?bound_session, "CSRF token mismatch");
            return Err(ValidationFailure::Unauthorized.into());
        }

        if record.is_exhausted() {
            debug!(session = ?bound_session, "use budget exhausted");
            return Err(ValidationFailure::Unauthorized.into());
        }

        let Some(remaining_uses) = self.vault.consume(&bound_session).await? else {
            debug!(session = ?bound_session, "use budget spent concurrently");
            return Err(ValidationFailure::Unauthorized.into());
        };

        debug!(session = ?bound_session, remaining_uses, "CSRF token accepted");
        Ok(Authorized::Consumed { remaining_uses })
    }

    fn check_host(&self, req: &CsrfRequest) -> Result<(), ValidationFailure> {
        match req.host.as_deref() {
            Some(host) if host.eq_ignore_ascii_case(&self.policy.allowed_host) => Ok(()),
            _ => Err(ValidationFailure::Forbidden),
        }
    }

    fn check_origin(&self, req: &CsrfRequest) -> Result<(), ValidationFailure> {
        if !self.policy.check_origin {
            return Ok(());
        }
        let allowed = self.policy.allowed_origin.as_deref();
        match (req.origin.as_deref(), allowed) {
            (Some(origin), Some(allowed)) if origin.eq_ignore_ascii_case(allowed) => Ok(()),
            (None, _) if is_safe(&req.method) => Ok(()),
            _ => Err(ValidationFailure::Forbidden),
        }
    }
}
