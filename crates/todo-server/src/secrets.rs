//! Secrets overlay.
//!
//! Deployments mount a JSON secrets document (database credentials, Redis
//! URL, token secret) and point `secrets.file` at it. Fields present in the
//! document override the static configuration before any service is
//! constructed.
//!
//! Failure policy: in development a retrieval failure is logged and the
//! static configuration stands; in production it aborts startup instead of
//! running with placeholder credentials.

use serde::Deserialize;

use crate::config::AppConfig;

/// Secret values that may override the static configuration.
#[derive(Debug, Default, Deserialize)]
pub struct SecretOverrides {
    pub db_url: Option<String>,
    pub redis_url: Option<String>,
    pub jwt_secret: Option<String>,
}

/// Errors raised while loading the secrets document.
#[derive(Debug, thiserror::Error)]
pub enum SecretsError {
    #[error("Failed to read secrets file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse secrets file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Loads the secrets document named by the configuration, if any.
fn load_overrides(path: &str) -> Result<SecretOverrides, SecretsError> {
    let raw = std::fs::read_to_string(path).map_err(|source| SecretsError::Read {
        path: path.to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| SecretsError::Parse {
        path: path.to_string(),
        source,
    })
}

/// Applies secret overrides to the configuration.
///
/// # Errors
///
/// In production, any retrieval or parse failure is returned to the caller
/// and must abort startup. In development the failure is logged and the
/// static configuration is kept.
pub fn apply_secrets(config: &mut AppConfig) -> Result<(), SecretsError> {
    let Some(path) = config.secrets.file.clone() else {
        tracing::debug!("no secrets file configured");
        return Ok(());
    };

    let overrides = match load_overrides(&path) {
        Ok(overrides) => overrides,
        Err(e) => {
            if config.environment.is_production() {
                return Err(e);
            }
            tracing::warn!(error = %e, "secrets unavailable, using static configuration");
            return Ok(());
        }
    };

    if let Some(db_url) = overrides.db_url {
        config.storage.url = db_url;
    }
    if let Some(redis_url) = overrides.redis_url {
        config.redis.url = redis_url;
    }
    if let Some(jwt_secret) = overrides.jwt_secret {
        config.auth.secret = jwt_secret;
    }

    tracing::info!(path = %path, "configuration updated with secrets");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;
    use std::io::Write;

    fn temp_secrets_file(contents: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "todo-secrets-test-{}-{contents_len}.json",
            std::process::id(),
            contents_len = contents.len()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn overrides_applied_when_present() {
        let path = temp_secrets_file(
            r#"{"db_url": "postgres://prod-host/todos", "jwt_secret": "prod-secret"}"#,
        );

        let mut config = AppConfig::default();
        config.secrets.file = Some(path.to_string_lossy().into_owned());
        apply_secrets(&mut config).unwrap();

        assert_eq!(config.storage.url, "postgres://prod-host/todos");
        assert_eq!(config.auth.secret, "prod-secret");
        // Fields absent from the document are untouched.
        assert_eq!(config.redis.url, "redis://localhost:6379");

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn missing_file_is_tolerated_in_development() {
        let mut config = AppConfig::default();
        config.secrets.file = Some("/nonexistent/secrets.json".into());
        assert!(apply_secrets(&mut config).is_ok());
        assert_eq!(config.storage.url, "postgres://localhost/todos");
    }

    #[test]
    fn missing_file_fails_startup_in_production() {
        let mut config = AppConfig::default();
        config.environment = Environment::Production;
        config.secrets.file = Some("/nonexistent/secrets.json".into());
        assert!(apply_secrets(&mut config).is_err());
    }

    #[test]
    fn malformed_document_fails_in_production() {
        let path = temp_secrets_file("not json at all");

        let mut config = AppConfig::default();
        config.environment = Environment::Production;
        config.secrets.file = Some(path.to_string_lossy().into_owned());
        let err = apply_secrets(&mut config).unwrap_err();
        assert!(matches!(err, SecretsError::Parse { .. }));

        std::fs::remove_file(path).ok();
    }
}
