//! Registration and login over a `UserStore`.

use std::sync::Arc;

use todo_core::{User, UserStore};

use crate::error::AuthError;
use crate::jwt::JwtService;
use crate::password;

/// The credential service: registers users and exchanges credentials for
/// signed tokens.
///
/// One instance per process, constructed by the entry point and shared
/// behind `Arc`.
pub struct AuthService {
    users: Arc<dyn UserStore>,
    jwt: Arc<JwtService>,
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(users: Arc<dyn UserStore>, jwt: Arc<JwtService>) -> Self {
        Self { users, jwt }
    }

    /// Registers a new user and issues their first token.
    ///
    /// The password is hashed before it reaches the store; the plaintext is
    /// dropped here and never logged.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the email is already registered.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(User, String), AuthError> {
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AuthError::conflict("User with this email already exists"));
        }

        let password_hash = password::hash_password(password)
            .map_err(|e| AuthError::internal(format!("password hashing failed: {e}")))?;

        let user = self.users.create(username, email, &password_hash).await?;
        tracing::info!(user_id = user.id, "user registered");

        let token = self.jwt.issue(&user)?;
        Ok((user, token))
    }

    /// Verifies credentials and issues a token.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCredentials` for an unknown email and for a failed
    /// password check alike.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AuthError> {
        let Some(user) = self.users.find_by_email(email).await? else {
            return Err(AuthError::InvalidCredentials);
        };

        // A corrupt stored hash verifies as false rather than leaking a 500.
        let valid = password::verify_password(password, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(AuthError::InvalidCredentials);
        }

        tracing::debug!(user_id = user.id, "login succeeded");
        let token = self.jwt.issue(&user)?;
        Ok((user, token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use todo_core::MemoryUserStore;

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(MemoryUserStore::new()),
            Arc::new(JwtService::new("test-secret", Duration::from_secs(3600))),
        )
    }

    #[tokio::test]
    async fn register_then_login() {
        let service = service();
        let (user, _) = service
            .register("alice", "alice@example.com", "hunter22")
            .await
            .unwrap();
        assert_eq!(user.username, "alice");
        assert_ne!(user.password_hash, "hunter22");

        let (logged_in, token) = service.login("alice@example.com", "hunter22").await.unwrap();
        assert_eq!(logged_in.id, user.id);
        assert!(!token.is_empty());
    }

    #[tokio::test]
    async fn duplicate_email_rejected() {
        let service = service();
        service
            .register("alice", "alice@example.com", "hunter22")
            .await
            .unwrap();

        let err = service
            .register("alice2", "alice@example.com", "hunter22")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Conflict { .. }));
        assert_eq!(err.to_string(), "User with this email already exists");
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_identical() {
        let service = service();
        service
            .register("alice", "alice@example.com", "hunter22")
            .await
            .unwrap();

        let wrong_password = service
            .login("alice@example.com", "wrong")
            .await
            .unwrap_err();
        let unknown_email = service.login("bob@example.com", "hunter22").await.unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn issued_token_carries_identity() {
        let jwt = Arc::new(JwtService::new("test-secret", Duration::from_secs(3600)));
        let service = AuthService::new(Arc::new(MemoryUserStore::new()), jwt.clone());

        let (user, token) = service
            .register("alice", "alice@example.com", "hunter22")
            .await
            .unwrap();

        let claims = jwt.verify(&token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.email, "alice@example.com");
    }
}
