//! Todo read cache over the generic backend.
//!
//! ## Cache Key Format
//!
//! - `todo:{id}` — a single todo snapshot
//! - `user:{id}:todos` — a user's todos, newest first
//!
//! Payloads are serde_json bytes. An entry that fails to deserialize is
//! invalidated and reported as a miss so the read falls through to the store.

use std::time::Duration;

use todo_core::Todo;

use super::backend::{CacheBackend, CacheStats};

/// Read cache for todo snapshots and per-user lists.
#[derive(Clone)]
pub struct TodoCache {
    backend: CacheBackend,
    ttl: Duration,
}

impl TodoCache {
    /// Create a new todo cache with the given backend and TTL.
    pub fn new(backend: CacheBackend, ttl: Duration) -> Self {
        Self { backend, ttl }
    }

    /// Generate the cache key for a single todo.
    #[inline]
    fn todo_key(id: i64) -> String {
        format!("todo:{id}")
    }

    /// Generate the cache key for a user's todo list.
    #[inline]
    fn user_todos_key(user_id: i64) -> String {
        format!("user:{user_id}:todos")
    }

    /// Get a cached todo by id.
    pub async fn get_todo(&self, id: i64) -> Option<Todo> {
        self.get_value(&Self::todo_key(id)).await
    }

    /// Cache a todo snapshot after a read or a refresh after a write.
    pub async fn put_todo(&self, todo: &Todo) {
        self.put_value(&Self::todo_key(todo.id), todo).await;
    }

    /// Drop the cached snapshot for a todo.
    pub async fn invalidate_todo(&self, id: i64) {
        self.backend.invalidate(&Self::todo_key(id)).await;
    }

    /// Get a user's cached todo list.
    pub async fn get_user_todos(&self, user_id: i64) -> Option<Vec<Todo>> {
        self.get_value(&Self::user_todos_key(user_id)).await
    }

    /// Cache a user's todo list.
    pub async fn put_user_todos(&self, user_id: i64, todos: &[Todo]) {
        self.put_value(&Self::user_todos_key(user_id), &todos).await;
    }

    /// Drop a user's cached todo list.
    pub async fn invalidate_user_todos(&self, user_id: i64) {
        self.backend.invalidate(&Self::user_todos_key(user_id)).await;
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.backend.stats()
    }

    async fn get_value<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let data = self.backend.get(key).await?;
        match serde_json::from_slice(&data) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to deserialize cached value");
                self.backend.invalidate(key).await;
                None
            }
        }
    }

    async fn put_value<T: serde::Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_vec(value) {
            Ok(data) => {
                self.backend.set(key, data, self.ttl).await;
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to serialize value for cache");
            }
        }
    }
}
