//! Authentication error types and their HTTP mapping.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use todo_core::StorageError;

use crate::jwt::JwtError;

/// Errors that can occur during authentication.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The email/password pair did not match a registered user. The message
    /// never distinguishes an unknown email from a wrong password.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The request lacks valid authentication credentials.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Description of why the request is unauthorized.
        message: String,
    },

    /// The presented token is malformed or carries a bad signature.
    #[error("Invalid token")]
    InvalidToken {
        /// Description of why the token is invalid (logged, not returned).
        message: String,
    },

    /// The presented token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// A unique field (email, username) is already taken.
    #[error("{message}")]
    Conflict {
        /// Description of the conflicting field.
        message: String,
    },

    /// An error occurred in the credential store.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage error.
        message: String,
    },

    /// An unexpected internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `Unauthorized` error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidToken` error.
    #[must_use]
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::InvalidToken {
            message: message.into(),
        }
    }

    /// Creates a new `Conflict` error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<StorageError> for AuthError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Conflict { message } => Self::Conflict { message },
            other => Self::storage(other.to_string()),
        }
    }
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => Self::TokenExpired,
            JwtError::InvalidSignature => Self::invalid_token("invalid signature"),
            JwtError::Malformed { message } => Self::InvalidToken { message },
            JwtError::Encoding { message } => Self::Internal { message },
        }
    }
}

/// Extracts the response details for an AuthError.
///
/// Returns (HTTP status, client-facing message).
fn error_details(error: &AuthError) -> (StatusCode, String) {
    match error {
        AuthError::InvalidCredentials => (
            StatusCode::BAD_REQUEST,
            "Invalid email or password".to_string(),
        ),
        AuthError::Conflict { message } => (StatusCode::BAD_REQUEST, message.clone()),
        AuthError::Unauthorized { message } => (StatusCode::UNAUTHORIZED, message.clone()),
        // Token diagnostics stay server-side; clients get the distinct but
        // terse reason.
        AuthError::InvalidToken { .. } => (StatusCode::UNAUTHORIZED, "Invalid token".to_string()),
        AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token expired".to_string()),
        AuthError::Storage { .. } | AuthError::Internal { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        ),
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = error_details(&self);

        if status.is_server_error() {
            tracing::error!(error = %self, "authentication failure");
        }

        (status, Json(json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let (status, _) = error_details(&AuthError::InvalidCredentials);
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, message) = error_details(&AuthError::TokenExpired);
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message, "Token expired");

        let (status, message) = error_details(&AuthError::invalid_token("bad segment count"));
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message, "Invalid token");

        let (status, _) = error_details(&AuthError::storage("db down"));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_jwt_error_conversion() {
        assert!(matches!(
            AuthError::from(JwtError::Expired),
            AuthError::TokenExpired
        ));
        assert!(matches!(
            AuthError::from(JwtError::InvalidSignature),
            AuthError::InvalidToken { .. }
        ));
    }

    #[test]
    fn test_storage_conflict_passes_through() {
        let err = AuthError::from(StorageError::conflict("email taken"));
        assert!(matches!(err, AuthError::Conflict { .. }));
        assert_eq!(err.to_string(), "email taken");
    }
}
