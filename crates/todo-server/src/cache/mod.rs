//! Read-through caching for todo reads.
//!
//! ## Architecture
//!
//! - **L1 (DashMap)**: In-memory, per-process, microsecond latency
//! - **L2 (Redis)**: Optional shared tier, established once at startup
//!
//! ## Fail-soft contract
//!
//! A cache error on `get` is a miss; an error on `set`/`invalidate` is
//! logged and swallowed. Cache unavailability never blocks a correct store
//! operation from succeeding or returning a result.

pub mod backend;
pub mod todos;

pub use backend::{CacheBackend, CacheStats, CachedEntry};
pub use todos::TodoCache;
