//! Storage traits implemented by every backend.
//!
//! Services hold these as trait objects so the PostgreSQL backend and the
//! in-memory reference store are interchangeable. Implementations must be
//! thread-safe (`Send + Sync`).

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::model::{Todo, TodoPatch, User};

/// Persistence for user accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Creates a new user with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the email or username is already
    /// registered.
    async fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> StorageResult<User>;

    /// Looks up a user by email. Returns `None` if no user matches.
    async fn find_by_email(&self, email: &str) -> StorageResult<Option<User>>;

    /// Looks up a user by id. Returns `None` if no user matches.
    async fn find_by_id(&self, id: i64) -> StorageResult<Option<User>>;
}

/// Persistence for todo items.
///
/// Ownership is not enforced here; the service layer checks `user_id` on
/// every operation. The store's contract is purely row-level.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Inserts a new todo owned by `user_id`, `completed` defaulting to false.
    async fn insert(
        &self,
        user_id: i64,
        title: &str,
        description: Option<&str>,
    ) -> StorageResult<Todo>;

    /// Looks up a todo by id. Returns `None` if no todo matches.
    async fn find_by_id(&self, id: i64) -> StorageResult<Option<Todo>>;

    /// Lists all todos owned by `user_id`, newest first.
    async fn list_by_user(&self, user_id: i64) -> StorageResult<Vec<Todo>>;

    /// Applies the populated fields of `patch` and bumps `updated_at`.
    ///
    /// Returns `None` if the todo no longer exists.
    async fn update(&self, id: i64, patch: &TodoPatch) -> StorageResult<Option<Todo>>;

    /// Deletes a todo. Returns whether a row was actually removed.
    async fn delete(&self, id: i64) -> StorageResult<bool>;

    /// Flips `completed` in a single atomic operation at the store, so two
    /// concurrent toggles can never lose an update.
    ///
    /// Returns `None` if the todo no longer exists.
    async fn toggle_completed(&self, id: i64) -> StorageResult<Option<Todo>>;
}
