//! PostgreSQL storage backend for the todo service.
//!
//! Implements the `UserStore` and `TodoStore` traits from `todo-core` over a
//! bounded sqlx connection pool. Each operation acquires one connection for
//! its duration; release is guaranteed on every exit path by pool semantics.

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod todo;
pub mod user;

pub use config::PostgresConfig;
pub use error::{PostgresError, Result};
pub use pool::create_pool;
pub use sqlx_postgres::PgPool;
pub use todo::PgTodoStore;
pub use user::PgUserStore;
