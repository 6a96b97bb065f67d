//! Bearer token authentication extractor.
//!
//! Protected handlers take a [`BearerAuth`] parameter; extraction fails with
//! a 401 before the handler body runs if the token is missing, malformed,
//! expired, or carries a bad signature.
//!
//! # Example
//!
//! ```ignore
//! async fn protected(BearerAuth(claims): BearerAuth) -> String {
//!     format!("hello, {}", claims.username)
//! }
//! ```

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::AuthError;
use crate::jwt::{Claims, JwtService};

/// State required for bearer token authentication.
///
/// Include this in the application state and expose it to the extractor via
/// `FromRef`.
#[derive(Clone)]
pub struct AuthState {
    /// JWT service for token verification.
    pub jwt: Arc<JwtService>,
}

impl AuthState {
    /// Creates a new auth state.
    pub fn new(jwt: Arc<JwtService>) -> Self {
        Self { jwt }
    }
}

/// Axum extractor that validates a bearer token and yields its claims.
pub struct BearerAuth(pub Claims);

impl<S> FromRequestParts<S> for BearerAuth
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);

        let Some(auth_header) = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
        else {
            return Err(AuthError::unauthorized("Authentication required"));
        };

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::unauthorized("Authentication token missing"))?;

        let claims = auth_state.jwt.verify(token).map_err(|e| {
            tracing::debug!(error = %e, "token verification failed");
            AuthError::from(e)
        })?;

        Ok(BearerAuth(claims))
    }
}
