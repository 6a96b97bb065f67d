//! Todo storage.
//!
//! Partial updates bind the populated patch fields into a fixed COALESCE
//! statement; SQL text is never assembled from request input. The completed
//! flag is flipped in a single atomic UPDATE so concurrent toggles cannot
//! lose a write.

use async_trait::async_trait;
use sqlx_core::query::query;
use sqlx_core::query_as::query_as;
use time::OffsetDateTime;

use todo_core::{StorageResult, Todo, TodoPatch, TodoStore};

use crate::error::map_sqlx_error;
use crate::PgPool;

/// Row tuple for the `todos` table.
type TodoRow = (
    i64,
    String,
    Option<String>,
    bool,
    i64,
    OffsetDateTime,
    OffsetDateTime,
);

fn todo_from_row(row: TodoRow) -> Todo {
    Todo {
        id: row.0,
        title: row.1,
        description: row.2,
        completed: row.3,
        user_id: row.4,
        created_at: row.5,
        updated_at: row.6,
    }
}

const TODO_COLUMNS: &str = "id, title, description, completed, user_id, created_at, updated_at";

/// PostgreSQL-backed `TodoStore`.
#[derive(Debug, Clone)]
pub struct PgTodoStore {
    pool: PgPool,
}

impl PgTodoStore {
    /// Creates a new todo store over a shared connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoStore for PgTodoStore {
    async fn insert(
        &self,
        user_id: i64,
        title: &str,
        description: Option<&str>,
    ) -> StorageResult<Todo> {
        let row: TodoRow = query_as(&format!(
            r#"
            INSERT INTO todos (title, description, user_id)
            VALUES ($1, $2, $3)
            RETURNING {TODO_COLUMNS}
            "#
        ))
        .bind(title)
        .bind(description)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id, "failed to insert todo");
            map_sqlx_error(e)
        })?;

        Ok(todo_from_row(row))
    }

    async fn find_by_id(&self, id: i64) -> StorageResult<Option<Todo>> {
        let row: Option<TodoRow> = query_as(&format!(
            r#"
            SELECT {TODO_COLUMNS}
            FROM todos
            WHERE id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, todo_id = id, "failed to query todo");
            map_sqlx_error(e)
        })?;

        Ok(row.map(todo_from_row))
    }

    async fn list_by_user(&self, user_id: i64) -> StorageResult<Vec<Todo>> {
        let rows: Vec<TodoRow> = query_as(&format!(
            r#"
            SELECT {TODO_COLUMNS}
            FROM todos
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id, "failed to list todos");
            map_sqlx_error(e)
        })?;

        Ok(rows.into_iter().map(todo_from_row).collect())
    }

    async fn update(&self, id: i64, patch: &TodoPatch) -> StorageResult<Option<Todo>> {
        let row: Option<TodoRow> = query_as(&format!(
            r#"
            UPDATE todos
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                completed = COALESCE($4, completed),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {TODO_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.title.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.completed)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, todo_id = id, "failed to update todo");
            map_sqlx_error(e)
        })?;

        Ok(row.map(todo_from_row))
    }

    async fn delete(&self, id: i64) -> StorageResult<bool> {
        let result = query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, todo_id = id, "failed to delete todo");
                map_sqlx_error(e)
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn toggle_completed(&self, id: i64) -> StorageResult<Option<Todo>> {
        let row: Option<TodoRow> = query_as(&format!(
            r#"
            UPDATE todos
            SET completed = NOT completed,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {TODO_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, todo_id = id, "failed to toggle todo");
            map_sqlx_error(e)
        })?;

        Ok(row.map(todo_from_row))
    }
}
