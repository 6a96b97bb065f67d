//! Shared fixtures: a full application state over in-memory stores and a
//! local-only cache, so the suites run without PostgreSQL or Redis.

use std::sync::Arc;
use std::time::Duration;

use todo_auth::{AuthService, AuthState, JwtService};
use todo_core::{MemoryTodoStore, MemoryUserStore};
use todo_server::cache::{CacheBackend, TodoCache};
use todo_server::server::AppState;
use todo_server::todos::TodoService;

pub struct TestHarness {
    pub state: AppState,
    pub jwt: Arc<JwtService>,
    pub todo_store: Arc<MemoryTodoStore>,
}

pub fn harness() -> TestHarness {
    let jwt = Arc::new(JwtService::new(
        "integration-test-secret",
        Duration::from_secs(3600),
    ));
    let todo_store = Arc::new(MemoryTodoStore::new());

    let auth_service = Arc::new(AuthService::new(
        Arc::new(MemoryUserStore::new()),
        jwt.clone(),
    ));
    let todos = Arc::new(TodoService::new(
        todo_store.clone(),
        TodoCache::new(CacheBackend::new_local(), Duration::from_secs(3600)),
    ));

    TestHarness {
        state: AppState {
            auth_service,
            todos,
            auth: AuthState::new(jwt.clone()),
        },
        jwt,
        todo_store,
    }
}
