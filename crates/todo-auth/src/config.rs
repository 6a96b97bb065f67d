//! Authentication configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Development fallback secret. `AppConfig::validate` refuses to run a
/// production server with this value.
pub const DEFAULT_SECRET: &str = "default_jwt_secret_do_not_use_in_production";

/// Token signing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared HS256 signing secret.
    #[serde(default = "default_secret")]
    pub secret: String,

    /// Token lifetime in seconds.
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,
}

fn default_secret() -> String {
    DEFAULT_SECRET.to_string()
}

fn default_token_ttl_secs() -> u64 {
    3600
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: default_secret(),
            token_ttl_secs: default_token_ttl_secs(),
        }
    }
}

impl AuthConfig {
    /// The token lifetime as a `Duration`.
    #[must_use]
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }

    /// Whether the secret is still the development fallback.
    #[must_use]
    pub fn is_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.token_ttl_secs, 3600);
        assert!(config.is_default_secret());
        assert_eq!(config.token_ttl(), Duration::from_secs(3600));
    }

    #[test]
    fn test_custom_secret_detected() {
        let config = AuthConfig {
            secret: "a-real-secret".into(),
            ..Default::default()
        };
        assert!(!config.is_default_secret());
    }
}
