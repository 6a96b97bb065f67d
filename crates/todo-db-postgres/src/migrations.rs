//! Schema migrations.
//!
//! The schema is small enough to manage with idempotent DDL executed at
//! startup: two tables and a secondary index on the todo owner column.

use sqlx_core::query::query;
use sqlx_postgres::PgPool;
use tracing::info;

use crate::error::{PostgresError, Result};

const CREATE_USERS: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        username VARCHAR(100) UNIQUE NOT NULL,
        email VARCHAR(255) UNIQUE NOT NULL,
        password VARCHAR(255) NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
"#;

const CREATE_TODOS: &str = r#"
    CREATE TABLE IF NOT EXISTS todos (
        id BIGSERIAL PRIMARY KEY,
        title VARCHAR(255) NOT NULL,
        description TEXT,
        completed BOOLEAN NOT NULL DEFAULT FALSE,
        user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
"#;

const CREATE_TODOS_USER_INDEX: &str = r#"
    CREATE INDEX IF NOT EXISTS idx_todos_user_id ON todos(user_id)
"#;

/// Creates tables and indexes if they don't exist yet.
///
/// # Errors
///
/// Returns an error if any DDL statement fails.
pub async fn run(pool: &PgPool) -> Result<()> {
    info!("Running database migrations");

    for (name, ddl) in [
        ("users", CREATE_USERS),
        ("todos", CREATE_TODOS),
        ("idx_todos_user_id", CREATE_TODOS_USER_INDEX),
    ] {
        query(ddl)
            .execute(pool)
            .await
            .map_err(|e| PostgresError::Migration(format!("{name}: {e}")))?;
    }

    info!("Database migrations complete");
    Ok(())
}
