//! Static bearer-token authentication.
//!
//! Every request must carry
//!
//! ```text
//! Authorization: Bearer <token>
//! ```
//!
//! where `<token>` equals the configured secret. The i-Reporter client expects
//! authentication failures in-band: a rejected request still gets HTTP 200,
//! with `result.code = -1` and a reason in `result.description`.
//!
//! # Example
//!
//! ```rust
//! use ireporter_mock::server::auth::{AuthError, BearerAuth};
//!
//! let auth = BearerAuth::new("gateway-pass");
//! assert!(auth.verify_authorization(Some("Bearer gateway-pass")).is_ok());
//! assert!(matches!(
//!     auth.verify_authorization(Some("Bearer nope")),
//!     Err(AuthError::InvalidToken)
//! ));
//! ```

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use super::handlers::{ResultResponse, ResultStatus};

/// Scheme prefix of the `Authorization` header, including the separating space.
pub const BEARER_PREFIX: &str = "Bearer ";

// =============================================================================
// Types
// =============================================================================

/// Authentication error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Header absent, not valid text, or not using the Bearer scheme
    MissingCredentials,

    /// Bearer token does not match the configured secret
    InvalidToken,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingCredentials => write!(f, "認証が必要です"),
            AuthError::InvalidToken => write!(f, "無効なトークンです"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        // A wrong token is worth noticing; a missing header is routine.
        match &self {
            AuthError::InvalidToken => warn!("Authentication failed: invalid token"),
            AuthError::MissingCredentials => debug!("Authentication failed: missing credentials"),
        }

        let body = ResultResponse::new(ResultStatus::failure(self.to_string()));
        (StatusCode::OK, Json(body)).into_response()
    }
}

// =============================================================================
// Bearer Token Authentication
// =============================================================================

/// Compares bearer tokens against a single static secret.
#[derive(Clone)]
pub struct BearerAuth {
    token: Vec<u8>,
}

impl BearerAuth {
    pub fn new(token: impl AsRef<[u8]>) -> Self {
        Self {
            token: token.as_ref().to_vec(),
        }
    }

    /// Check a raw `Authorization` header value.
    pub fn verify_authorization(&self, header: Option<&str>) -> Result<(), AuthError> {
        let token = header
            .and_then(|value| value.strip_prefix(BEARER_PREFIX))
            .ok_or(AuthError::MissingCredentials)?;

        self.verify_token(token)
    }

    /// Check a bare token in constant time.
    pub fn verify_token(&self, token: &str) -> Result<(), AuthError> {
        if token.as_bytes().ct_eq(&self.token).into() {
            Ok(())
        } else {
            Err(AuthError::InvalidToken)
        }
    }
}

// =============================================================================
// Axum Middleware
// =============================================================================

/// Reject requests without a valid bearer token before they reach a handler.
///
/// Applied to every route and to the not-found fallback, so an
/// unauthenticated request to an unknown path gets the auth failure, not 404.
pub async fn auth_middleware(
    State(auth): State<BearerAuth>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    auth.verify_authorization(header)?;

    Ok(next.run(request).await)
}

// =============================================================================
// Tests
// =============================================================================
