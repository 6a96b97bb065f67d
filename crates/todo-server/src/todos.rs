//! Todo CRUD with per-user ownership and read-through caching.
//!
//! Every operation takes the authenticated user id supplied by the boundary
//! after token verification. The ownership policy is uniform: look the todo
//! up, absence is `NotFound`, an owner mismatch is `Forbidden`, a match
//! proceeds.
//!
//! Reads go through the cache and tolerate TTL-bounded staleness; mutation
//! paths do their ownership pre-check against the store directly so they
//! never act on stale ownership. This asymmetry is deliberate.

use std::sync::Arc;

use todo_core::{Todo, TodoPatch, TodoStore};

use crate::cache::TodoCache;
use crate::error::ApiError;

/// The todo service: CRUD + toggle, composing the store and the cache.
///
/// One instance per process, shared behind `Arc`.
pub struct TodoService {
    store: Arc<dyn TodoStore>,
    cache: TodoCache,
}

impl TodoService {
    /// Creates a new todo service.
    pub fn new(store: Arc<dyn TodoStore>, cache: TodoCache) -> Self {
        Self { store, cache }
    }

    /// The cache, exposed for instrumentation.
    pub fn cache(&self) -> &TodoCache {
        &self.cache
    }

    /// Creates a todo owned by `user_id`.
    ///
    /// The owner's list cache is invalidated, never pre-populated, so the
    /// next list read reflects the new todo immediately.
    pub async fn create(
        &self,
        user_id: i64,
        title: &str,
        description: Option<&str>,
    ) -> Result<Todo, ApiError> {
        let todo = self.store.insert(user_id, title, description).await?;
        self.cache.invalidate_user_todos(user_id).await;
        tracing::debug!(todo_id = todo.id, user_id, "todo created");
        Ok(todo)
    }

    /// Fetches a single todo, read-through.
    ///
    /// A cache hit returns without touching the store. The existence check
    /// precedes the ownership check regardless of where the todo came from.
    pub async fn get(&self, user_id: i64, todo_id: i64) -> Result<Todo, ApiError> {
        if let Some(todo) = self.cache.get_todo(todo_id).await {
            return check_owner(todo, user_id, "access");
        }

        let Some(todo) = self.store.find_by_id(todo_id).await? else {
            return Err(ApiError::not_found("Todo not found"));
        };
        self.cache.put_todo(&todo).await;

        check_owner(todo, user_id, "access")
    }

    /// Lists the user's todos, newest first, read-through.
    pub async fn list(&self, user_id: i64) -> Result<Vec<Todo>, ApiError> {
        if let Some(todos) = self.cache.get_user_todos(user_id).await {
            return Ok(todos);
        }

        let todos = self.store.list_by_user(user_id).await?;
        self.cache.put_user_todos(user_id, &todos).await;
        Ok(todos)
    }

    /// Applies a partial update.
    ///
    /// On success the todo snapshot is refreshed and the owner's list cache
    /// is invalidated (not refreshed).
    pub async fn update(
        &self,
        user_id: i64,
        todo_id: i64,
        patch: &TodoPatch,
    ) -> Result<Todo, ApiError> {
        self.check_owner_fresh(user_id, todo_id, "update").await?;

        let Some(todo) = self.store.update(todo_id, patch).await? else {
            // The row vanished between the ownership check and the update.
            return Err(ApiError::internal("Failed to update todo"));
        };

        self.refresh_after_write(&todo).await;
        Ok(todo)
    }

    /// Deletes a todo and invalidates both cache entries.
    pub async fn delete(&self, user_id: i64, todo_id: i64) -> Result<(), ApiError> {
        self.check_owner_fresh(user_id, todo_id, "delete").await?;

        if !self.store.delete(todo_id).await? {
            // Lost a race with a concurrent delete.
            return Err(ApiError::internal("Failed to delete todo"));
        }

        self.cache.invalidate_todo(todo_id).await;
        self.cache.invalidate_user_todos(user_id).await;
        tracing::debug!(todo_id, user_id, "todo deleted");
        Ok(())
    }

    /// Flips the completed flag atomically at the store.
    pub async fn toggle_completed(&self, user_id: i64, todo_id: i64) -> Result<Todo, ApiError> {
        self.check_owner_fresh(user_id, todo_id, "update").await?;

        let Some(todo) = self.store.toggle_completed(todo_id).await? else {
            return Err(ApiError::internal("Failed to update todo"));
        };

        self.refresh_after_write(&todo).await;
        Ok(todo)
    }

    /// Ownership pre-check for mutation paths, always against the store.
    async fn check_owner_fresh(
        &self,
        user_id: i64,
        todo_id: i64,
        action: &str,
    ) -> Result<Todo, ApiError> {
        let Some(todo) = self.store.find_by_id(todo_id).await? else {
            return Err(ApiError::not_found("Todo not found"));
        };
        check_owner(todo, user_id, action)
    }

    async fn refresh_after_write(&self, todo: &Todo) {
        self.cache.put_todo(todo).await;
        self.cache.invalidate_user_todos(todo.user_id).await;
    }
}

fn check_owner(todo: Todo, user_id: i64, action: &str) -> Result<Todo, ApiError> {
    if todo.user_id != user_id {
        return Err(ApiError::forbidden(format!(
            "You do not have permission to {action} this todo"
        )));
    }
    Ok(todo)
}
