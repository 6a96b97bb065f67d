//! Integration tests for the todo service: ownership policy, read-through
//! caching, and the cache refresh/invalidate rules on write paths.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use todo_core::{
    MemoryTodoStore, StorageResult, Todo, TodoPatch, TodoStore,
};
use todo_server::cache::{CacheBackend, TodoCache};
use todo_server::todos::TodoService;

const OWNER: i64 = 1;
const STRANGER: i64 = 2;

fn service_with_store(store: Arc<dyn TodoStore>) -> TodoService {
    TodoService::new(
        store,
        TodoCache::new(CacheBackend::new_local(), Duration::from_secs(3600)),
    )
}

fn service() -> (TodoService, Arc<MemoryTodoStore>) {
    let store = Arc::new(MemoryTodoStore::new());
    (service_with_store(store.clone()), store)
}

#[tokio::test]
async fn create_then_get() {
    let (service, _) = service();

    let created = service.create(OWNER, "buy milk", Some("2 liters")).await.unwrap();
    assert!(!created.completed);

    let fetched = service.get(OWNER, created.id).await.unwrap();
    assert_eq!(fetched.title, "buy milk");
    assert_eq!(fetched.description.as_deref(), Some("2 liters"));
    assert!(!fetched.completed);
}

#[tokio::test]
async fn second_get_is_served_from_cache() {
    let (service, store) = service();
    let created = service.create(OWNER, "cached", None).await.unwrap();

    // First read populates the cache from the store.
    service.get(OWNER, created.id).await.unwrap();
    let hits_before = service.cache().stats().hits;

    // Corrupt the backing store directly; the cached snapshot must win.
    let mut corrupted = created.clone();
    corrupted.title = "corrupted".into();
    store.put_raw(corrupted);

    let fetched = service.get(OWNER, created.id).await.unwrap();
    assert_eq!(fetched.title, "cached");
    assert_eq!(service.cache().stats().hits, hits_before + 1);
}

#[tokio::test]
async fn get_missing_is_not_found() {
    let (service, _) = service();
    let err = service.get(OWNER, 999).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
    assert_eq!(err.to_string(), "Todo not found");
}

#[tokio::test]
async fn get_by_non_owner_is_forbidden_not_not_found() {
    let (service, _) = service();
    let created = service.create(OWNER, "private", None).await.unwrap();

    let err = service.get(STRANGER, created.id).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn list_reflects_create_immediately() {
    let (service, _) = service();

    service.create(OWNER, "first", None).await.unwrap();
    // Prime the list cache.
    assert_eq!(service.list(OWNER).await.unwrap().len(), 1);

    // Invalidate-on-create is mandatory, not eventual.
    service.create(OWNER, "second", None).await.unwrap();
    let todos = service.list(OWNER).await.unwrap();
    assert_eq!(todos.len(), 2);
    assert_eq!(todos[0].title, "second");
}

#[tokio::test]
async fn update_with_only_completed_preserves_other_fields() {
    let (service, _) = service();
    let created = service
        .create(OWNER, "keep me", Some("and me"))
        .await
        .unwrap();

    let patch = TodoPatch {
        completed: Some(true),
        ..Default::default()
    };
    let updated = service.update(OWNER, created.id, &patch).await.unwrap();

    assert!(updated.completed);
    assert_eq!(updated.title, "keep me");
    assert_eq!(updated.description.as_deref(), Some("and me"));
}

#[tokio::test]
async fn update_refreshes_the_todo_cache() {
    let (service, _) = service();
    let created = service.create(OWNER, "before", None).await.unwrap();
    // Prime the snapshot cache.
    service.get(OWNER, created.id).await.unwrap();

    let patch = TodoPatch {
        title: Some("after".into()),
        ..Default::default()
    };
    service.update(OWNER, created.id, &patch).await.unwrap();

    // The cached snapshot was refreshed, not left stale.
    let fetched = service.get(OWNER, created.id).await.unwrap();
    assert_eq!(fetched.title, "after");
}

#[tokio::test]
async fn mutations_check_ownership_against_the_store_not_the_cache() {
    let (service, _) = service();
    let created = service.create(OWNER, "mine", None).await.unwrap();

    // Poison the snapshot cache with a copy claiming the stranger owns it.
    let mut forged = created.clone();
    forged.user_id = STRANGER;
    service.cache().put_todo(&forged).await;

    // Reads tolerate cache staleness; mutations must not.
    let err = service
        .update(STRANGER, created.id, &TodoPatch::default())
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn update_and_delete_by_non_owner_are_forbidden() {
    let (service, _) = service();
    let created = service.create(OWNER, "private", None).await.unwrap();

    let patch = TodoPatch {
        completed: Some(true),
        ..Default::default()
    };
    let err = service.update(STRANGER, created.id, &patch).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::FORBIDDEN);

    let err = service.delete(STRANGER, created.id).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::FORBIDDEN);

    let err = service
        .toggle_completed(STRANGER, created.id)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let (service, _) = service();
    let created = service.create(OWNER, "short-lived", None).await.unwrap();
    // Prime the snapshot cache so delete has something to invalidate.
    service.get(OWNER, created.id).await.unwrap();

    service.delete(OWNER, created.id).await.unwrap();

    let err = service.get(OWNER, created.id).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn toggle_twice_restores_parity() {
    let (service, _) = service();
    let created = service.create(OWNER, "flip", None).await.unwrap();

    let once = service.toggle_completed(OWNER, created.id).await.unwrap();
    assert!(once.completed);

    let twice = service.toggle_completed(OWNER, created.id).await.unwrap();
    assert!(!twice.completed);
}

#[tokio::test]
async fn concurrent_toggles_never_lose_an_update() {
    let store = Arc::new(MemoryTodoStore::new());
    let service = Arc::new(service_with_store(store.clone()));
    let created = service.create(OWNER, "contended", None).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = service.clone();
        let id = created.id;
        handles.push(tokio::spawn(async move {
            service.toggle_completed(OWNER, id).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    // An even number of atomic flips lands back on the original parity.
    let stored = store.find_by_id(created.id).await.unwrap().unwrap();
    assert!(!stored.completed);
}

/// Store double that reports rows present but refuses to mutate them,
/// simulating losing the race to a concurrent delete between the ownership
/// pre-check and the write.
struct VanishingStore {
    inner: MemoryTodoStore,
}

#[async_trait]
impl TodoStore for VanishingStore {
    async fn insert(
        &self,
        user_id: i64,
        title: &str,
        description: Option<&str>,
    ) -> StorageResult<Todo> {
        self.inner.insert(user_id, title, description).await
    }

    async fn find_by_id(&self, id: i64) -> StorageResult<Option<Todo>> {
        self.inner.find_by_id(id).await
    }

    async fn list_by_user(&self, user_id: i64) -> StorageResult<Vec<Todo>> {
        self.inner.list_by_user(user_id).await
    }

    async fn update(&self, _id: i64, _patch: &TodoPatch) -> StorageResult<Option<Todo>> {
        Ok(None)
    }

    async fn delete(&self, _id: i64) -> StorageResult<bool> {
        Ok(false)
    }

    async fn toggle_completed(&self, _id: i64) -> StorageResult<Option<Todo>> {
        Ok(None)
    }
}

#[tokio::test]
async fn losing_a_delete_race_surfaces_internal_error() {
    let service = service_with_store(Arc::new(VanishingStore {
        inner: MemoryTodoStore::new(),
    }));
    let created = service.create(OWNER, "doomed", None).await.unwrap();

    let err = service.delete(OWNER, created.id).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(err.to_string(), "Failed to delete todo");

    let err = service
        .update(OWNER, created.id, &TodoPatch::default())
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(err.to_string(), "Failed to update todo");
}
