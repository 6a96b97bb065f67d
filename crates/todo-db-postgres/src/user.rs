//! User storage.

use async_trait::async_trait;
use sqlx_core::query_as::query_as;
use time::OffsetDateTime;

use todo_core::{StorageError, StorageResult, User, UserStore};

use crate::error::map_sqlx_error;
use crate::PgPool;

/// Row tuple for the `users` table.
type UserRow = (i64, String, String, String, OffsetDateTime, OffsetDateTime);

fn user_from_row(row: UserRow) -> User {
    User {
        id: row.0,
        username: row.1,
        email: row.2,
        password_hash: row.3,
        created_at: row.4,
        updated_at: row.5,
    }
}

/// PostgreSQL-backed `UserStore`.
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Creates a new user store over a shared connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> StorageResult<User> {
        let row: UserRow = query_as(
            r#"
            INSERT INTO users (username, email, password)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password, created_at, updated_at
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx_core::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return StorageError::conflict(format!(
                    "User with email '{email}' or username '{username}' already exists"
                ));
            }
            tracing::error!(error = %e, "failed to insert user");
            map_sqlx_error(e)
        })?;

        Ok(user_from_row(row))
    }

    async fn find_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        let row: Option<UserRow> = query_as(
            r#"
            SELECT id, username, email, password, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "failed to query user by email");
            map_sqlx_error(e)
        })?;

        Ok(row.map(user_from_row))
    }

    async fn find_by_id(&self, id: i64) -> StorageResult<Option<User>> {
        let row: Option<UserRow> = query_as(
            r#"
            SELECT id, username, email, password, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id = id, "failed to query user by id");
            map_sqlx_error(e)
        })?;

        Ok(row.map(user_from_row))
    }
}
