//! Core domain types and storage abstractions for the todo service.
//!
//! This crate defines the `User` and `Todo` domain model, the storage error
//! taxonomy, and the `UserStore`/`TodoStore` traits that storage backends
//! implement. An in-memory reference implementation is provided for tests
//! and local development.

pub mod error;
pub mod memory;
pub mod model;
pub mod store;

pub use error::{StorageError, StorageResult};
pub use memory::{MemoryTodoStore, MemoryUserStore};
pub use model::{Todo, TodoPatch, User};
pub use store::{TodoStore, UserStore};
