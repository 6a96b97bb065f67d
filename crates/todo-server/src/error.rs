//! The boundary error taxonomy and its HTTP mapping.
//!
//! Every failure a handler can produce resolves to one of five kinds; the
//! response body is `{message}`, with an extra `detail` field carrying the
//! underlying error text when the server runs outside production.

use std::sync::OnceLock;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use todo_auth::AuthError;
use todo_core::StorageError;

static EXPOSE_DETAILS: OnceLock<bool> = OnceLock::new();

/// Enables the `detail` field on error responses. Called once at startup,
/// outside production only.
pub fn expose_error_details(enabled: bool) {
    let _ = EXPOSE_DETAILS.set(enabled);
}

fn details_exposed() -> bool {
    *EXPOSE_DETAILS.get().unwrap_or(&false)
}

/// Errors surfaced by the HTTP boundary.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Validation failure or a conflicting unique field.
    #[error("{message}")]
    BadRequest { message: String },

    /// Missing, invalid, or expired credentials.
    #[error("{message}")]
    Unauthorized { message: String },

    /// The acting user does not own the resource.
    #[error("{message}")]
    Forbidden { message: String },

    /// The resource or route does not exist.
    #[error("{message}")]
    NotFound { message: String },

    /// Store or cache failure not classified above.
    #[error("{message}")]
    Internal {
        /// Client-facing message.
        message: String,
        /// Underlying error text, exposed only outside production.
        detail: Option<String>,
    },
}

impl ApiError {
    /// Creates a new `BadRequest` error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Creates a new `Unauthorized` error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates a new `Forbidden` error.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            detail: None,
        }
    }

    /// Creates a new `Internal` error carrying the underlying error text.
    #[must_use]
    pub fn internal_with_detail(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            detail: Some(detail.into()),
        }
    }

    /// The HTTP status this error maps to.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { resource, .. } => Self::not_found(format!("{resource} not found")),
            StorageError::Conflict { message } => Self::BadRequest { message },
            other => {
                tracing::error!(error = %other, "storage failure reached the boundary");
                Self::internal_with_detail("Internal server error", other.to_string())
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Self::bad_request("Invalid email or password"),
            AuthError::Conflict { message } => Self::BadRequest { message },
            AuthError::Unauthorized { message } => Self::Unauthorized { message },
            AuthError::InvalidToken { .. } => Self::unauthorized("Invalid token"),
            AuthError::TokenExpired => Self::unauthorized("Token expired"),
            other => {
                tracing::error!(error = %other, "auth failure reached the boundary");
                Self::internal_with_detail("Internal server error", other.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = json!({ "message": self.to_string() });

        if let Self::Internal {
            detail: Some(detail),
            ..
        } = &self
            && details_exposed()
        {
            body["detail"] = json!(detail);
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::bad_request("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::unauthorized("x").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::forbidden("x").status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::internal("x").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_storage_error_conversion() {
        let err = ApiError::from(StorageError::not_found("Todo", 9));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Todo not found");

        let err = ApiError::from(StorageError::conflict("email taken"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = ApiError::from(StorageError::internal("boom"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Internal server error");
    }

    #[test]
    fn test_auth_error_conversion() {
        let err = ApiError::from(AuthError::TokenExpired);
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "Token expired");

        let err = ApiError::from(AuthError::conflict("User with this email already exists"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
