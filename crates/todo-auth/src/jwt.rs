//! JWT issuance and verification.
//!
//! Tokens are signed with HS256 over a shared secret and embed the identity
//! of the authenticated user. Verification reports expiry, bad signatures,
//! and malformed input as distinct outcomes so the HTTP boundary can answer
//! with distinct 401 messages.

use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use todo_core::User;

// ============================================================================
// Error Types
// ============================================================================

/// Outcome of a failed JWT operation.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// The token's `exp` claim has passed.
    #[error("Token expired")]
    Expired,

    /// The signature does not match the shared secret.
    #[error("Invalid signature")]
    InvalidSignature,

    /// The token is structurally invalid or its claims cannot be decoded.
    #[error("Malformed token: {message}")]
    Malformed {
        /// Description of the decoding failure.
        message: String,
    },

    /// Failed to encode a token.
    #[error("Failed to encode token: {message}")]
    Encoding {
        /// Description of the encoding failure.
        message: String,
    },
}

impl JwtError {
    /// Creates a new `Malformed` error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    /// Creates a new `Encoding` error.
    #[must_use]
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding {
            message: message.into(),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for JwtError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            _ => Self::malformed(err.to_string()),
        }
    }
}

// ============================================================================
// Claims
// ============================================================================

/// Claims embedded in every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The authenticated user's id.
    pub sub: i64,
    pub username: String,
    pub email: String,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

impl Claims {
    /// The user id this token authenticates.
    #[must_use]
    pub fn user_id(&self) -> i64 {
        self.sub
    }
}

// ============================================================================
// JWT Service
// ============================================================================

/// Encodes and verifies access tokens with a shared HS256 secret.
///
/// Thread-safe (`Send + Sync`); a single instance is shared across the
/// process.
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl JwtService {
    /// Creates a new JWT service.
    ///
    /// # Arguments
    /// * `secret` - The shared signing secret
    /// * `ttl` - Token lifetime, measured from issuance
    #[must_use]
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Issues a token for an authenticated user.
    ///
    /// # Errors
    /// Returns an error if encoding fails.
    pub fn issue(&self, user: &User) -> Result<String, JwtError> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            iat: now,
            exp: now + self.ttl.as_secs() as i64,
        };
        self.encode(&claims)
    }

    /// Encodes pre-built claims into a token string.
    ///
    /// # Errors
    /// Returns an error if encoding fails.
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| JwtError::encoding(e.to_string()))
    }

    /// Decodes and validates a token.
    ///
    /// # Errors
    /// Returns `Expired`, `InvalidSignature`, or `Malformed` depending on
    /// what the verification rejected.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // No leeway: a token past its exp is expired, full stop.
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }

    /// The configured token lifetime.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

// ============================================================================
// Tests
// ============================================================================
