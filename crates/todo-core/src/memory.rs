//! In-memory storage backend.
//!
//! Keeps the full store contract (conflicts, atomic toggle, newest-first
//! listing) over `DashMap`, so service logic can be exercised without a
//! database. Used heavily by the test suites.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use time::OffsetDateTime;

use crate::error::{StorageError, StorageResult};
use crate::model::{Todo, TodoPatch, User};
use crate::store::{TodoStore, UserStore};

/// In-memory `UserStore`.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: DashMap<i64, User>,
    next_id: AtomicI64,
}

impl MemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> StorageResult<User> {
        for entry in self.users.iter() {
            if entry.value().email == email {
                return Err(StorageError::conflict(format!(
                    "email '{email}' already registered"
                )));
            }
            if entry.value().username == username {
                return Err(StorageError::conflict(format!(
                    "username '{username}' already taken"
                )));
            }
        }

        let now = OffsetDateTime::now_utc();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let user = User {
            id,
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|entry| entry.value().email == email)
            .map(|entry| entry.value().clone()))
    }

    async fn find_by_id(&self, id: i64) -> StorageResult<Option<User>> {
        Ok(self.users.get(&id).map(|entry| entry.value().clone()))
    }
}

/// In-memory `TodoStore`.
#[derive(Debug, Default)]
pub struct MemoryTodoStore {
    todos: DashMap<i64, Todo>,
    next_id: AtomicI64,
}

impl MemoryTodoStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            todos: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Overwrites a stored todo directly, bypassing the normal mutation
    /// paths. Lets tests corrupt the backing store to prove a read was
    /// served from cache.
    pub fn put_raw(&self, todo: Todo) {
        self.todos.insert(todo.id, todo);
    }
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    async fn insert(
        &self,
        user_id: i64,
        title: &str,
        description: Option<&str>,
    ) -> StorageResult<Todo> {
        let now = OffsetDateTime::now_utc();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let todo = Todo {
            id,
            title: title.to_string(),
            description: description.map(ToString::to_string),
            completed: false,
            user_id,
            created_at: now,
            updated_at: now,
        };
        self.todos.insert(id, todo.clone());
        Ok(todo)
    }

    async fn find_by_id(&self, id: i64) -> StorageResult<Option<Todo>> {
        Ok(self.todos.get(&id).map(|entry| entry.value().clone()))
    }

    async fn list_by_user(&self, user_id: i64) -> StorageResult<Vec<Todo>> {
        let mut todos: Vec<Todo> = self
            .todos
            .iter()
            .filter(|entry| entry.value().user_id == user_id)
            .map(|entry| entry.value().clone())
            .collect();
        // Newest first; id breaks ties for entries created in the same instant.
        todos.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(todos)
    }

    async fn update(&self, id: i64, patch: &TodoPatch) -> StorageResult<Option<Todo>> {
        match self.todos.get_mut(&id) {
            Some(mut entry) => {
                if let Some(title) = &patch.title {
                    entry.title = title.clone();
                }
                if let Some(description) = &patch.description {
                    entry.description = Some(description.clone());
                }
                if let Some(completed) = patch.completed {
                    entry.completed = completed;
                }
                entry.updated_at = OffsetDateTime::now_utc();
                Ok(Some(entry.value().clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i64) -> StorageResult<bool> {
        Ok(self.todos.remove(&id).is_some())
    }

    async fn toggle_completed(&self, id: i64) -> StorageResult<Option<Todo>> {
        // The entry guard makes the flip atomic with respect to other togglers.
        match self.todos.get_mut(&id) {
            Some(mut entry) => {
                entry.completed = !entry.completed;
                entry.updated_at = OffsetDateTime::now_utc();
                Ok(Some(entry.value().clone()))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_assigns_monotonic_ids() {
        let store = MemoryUserStore::new();
        let a = store.create("alice", "alice@example.com", "h1").await.unwrap();
        let b = store.create("bob", "bob@example.com", "h2").await.unwrap();
        assert!(b.id > a.id);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = MemoryUserStore::new();
        store.create("alice", "alice@example.com", "h1").await.unwrap();
        let err = store
            .create("alice2", "alice@example.com", "h2")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Conflict { .. }));
    }

    #[tokio::test]
    async fn partial_update_leaves_other_fields() {
        let store = MemoryTodoStore::new();
        let todo = store.insert(1, "title", Some("desc")).await.unwrap();

        let patch = TodoPatch {
            completed: Some(true),
            ..Default::default()
        };
        let updated = store.update(todo.id, &patch).await.unwrap().unwrap();

        assert!(updated.completed);
        assert_eq!(updated.title, "title");
        assert_eq!(updated.description.as_deref(), Some("desc"));
    }

    #[tokio::test]
    async fn toggle_twice_restores_parity() {
        let store = MemoryTodoStore::new();
        let todo = store.insert(1, "t", None).await.unwrap();
        assert!(!todo.completed);

        let once = store.toggle_completed(todo.id).await.unwrap().unwrap();
        assert!(once.completed);
        let twice = store.toggle_completed(todo.id).await.unwrap().unwrap();
        assert!(!twice.completed);
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = MemoryTodoStore::new();
        store.insert(1, "first", None).await.unwrap();
        store.insert(1, "second", None).await.unwrap();
        store.insert(2, "other user", None).await.unwrap();

        let todos = store.list_by_user(1).await.unwrap();
        assert_eq!(todos.len(), 2);
        assert_eq!(todos[0].title, "second");
        assert_eq!(todos[1].title, "first");
    }

    #[tokio::test]
    async fn delete_reports_missing_rows() {
        let store = MemoryTodoStore::new();
        let todo = store.insert(1, "t", None).await.unwrap();
        assert!(store.delete(todo.id).await.unwrap());
        assert!(!store.delete(todo.id).await.unwrap());
    }
}
