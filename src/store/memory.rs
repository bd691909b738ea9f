//! In-memory todo store guarded by a reader/writer lock.
//!
//! Reads (`list_all`, `get`, `len`) share the lock; every mutation takes it
//! exclusively. No lock guard is held across an await point other than the
//! lock acquisition itself, so each call is atomic on its own. The
//! `todos_stored` gauge is published under the write lock, so it always
//! matches the last completed mutation.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, instrument};

use super::types::{Todo, TodoDraft, TodoId};
use crate::error::StoreError;
use crate::metrics;

/// First identifier handed out by a fresh or cleared store.
pub const FIRST_ID: TodoId = 1;

/// Handle shared between the router and request tasks.
pub type SharedStore = Arc<MemoryStore>;

#[derive(Debug)]
struct State {
    todos: BTreeMap<TodoId, Todo>,
    /// Strictly greater than every id ever issued.
    next_id: TodoId,
}

impl State {
    fn empty() -> Self {
        Self {
            todos: BTreeMap::new(),
            next_id: FIRST_ID,
        }
    }
}

/// Authoritative owner of the todo collection.
#[derive(Debug)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State::empty()),
        }
    }

    /// Create an empty store behind a shareable handle.
    pub fn shared() -> SharedStore {
        Arc::new(Self::new())
    }

    /// Snapshot of all todos, ascending by identifier.
    pub async fn list_all(&self) -> Vec<Todo> {
        let state = self.state.read().await;
        state.todos.values().cloned().collect()
    }

    /// Fetch a single todo.
    pub async fn get(&self, id: TodoId) -> Result<Todo, StoreError> {
        let state = self.state.read().await;
        state
            .todos
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound { id })
    }

    /// Insert a new todo under the next identifier and return it.
    #[instrument(skip(self, draft))]
    pub async fn create(&self, draft: TodoDraft) -> Todo {
        let mut state = self.state.write().await;
        let id = state.next_id;
        state.next_id += 1;

        let todo = draft.into_todo(id);
        state.todos.insert(id, todo.clone());
        metrics::set_todos_stored(state.todos.len());
        debug!(id, "todo created");
        todo
    }

    /// Replace every field of an existing todo except its identifier.
    #[instrument(skip(self, draft))]
    pub async fn update(&self, id: TodoId, draft: TodoDraft) -> Result<Todo, StoreError> {
        let mut state = self.state.write().await;
        let slot = state
            .todos
            .get_mut(&id)
            .ok_or(StoreError::NotFound { id })?;

        *slot = draft.into_todo(id);
        debug!("todo replaced");
        Ok(slot.clone())
    }

    /// Remove a todo permanently. Its identifier is never reissued.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: TodoId) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if state.todos.remove(&id).is_none() {
            return Err(StoreError::NotFound { id });
        }
        metrics::set_todos_stored(state.todos.len());
        debug!("todo deleted");
        Ok(())
    }

    /// Drop every todo and restart identifiers at [`FIRST_ID`].
    ///
    /// Test and reset tooling only; no request path reaches this.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        *state = State::empty();
        metrics::set_todos_stored(0);
        debug!("store cleared");
    }

    /// Number of todos currently held.
    pub async fn len(&self) -> usize {
        self.state.read().await.todos.len()
    }

    /// Whether the store holds no todos.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn new_store_is_empty() {
        let store = MemoryStore::new();
        assert!(store.list_all().await.is_empty());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn create_assigns_increasing_ids_from_one() {
        let store = MemoryStore::new();
        let first = store.create(TodoDraft::new("Buy groceries")).await;
        let second = store.create(TodoDraft::new("Walk the dog")).await;

        assert_eq!(first.id, FIRST_ID);
        assert_eq!(second.id, FIRST_ID + 1);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn get_returns_what_was_created() {
        let store = MemoryStore::new();
        let created = store
            .create(TodoDraft::new("Read a book").completed(true))
            .await;

        let fetched = store.get(created.id).await.unwrap();
        assert_eq!(
            fetched,
            Todo {
                id: created.id,
                title: "Read a book".to_string(),
                completed: true,
            }
        );
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let store = MemoryStore::new();
        assert_eq!(store.get(5).await, Err(StoreError::NotFound { id: 5 }));
    }

    #[tokio::test]
    async fn deleted_ids_are_never_reused() {
        let store = MemoryStore::new();
        let a = store.create(TodoDraft::new("a")).await;
        let b = store.create(TodoDraft::new("b")).await;
        store.delete(b.id).await.unwrap();
        store.delete(a.id).await.unwrap();

        let c = store.create(TodoDraft::new("c")).await;
        assert!(c.id > b.id);
        assert_eq!(store.list_all().await, vec![c]);
    }

    #[tokio::test]
    async fn update_keeps_id_and_replaces_fields() {
        let store = MemoryStore::new();
        let created = store.create(TodoDraft::new("Buy groceries")).await;

        let updated = store
            .update(created.id, TodoDraft::new("Buy milk").completed(true))
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "Buy milk");
        assert!(updated.completed);
        assert_eq!(store.get(created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn update_missing_is_not_found_and_inserts_nothing() {
        let store = MemoryStore::new();
        let result = store.update(99_999, TodoDraft::new("ghost")).await;

        assert_eq!(result, Err(StoreError::NotFound { id: 99_999 }));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn delete_twice_fails_second_time() {
        let store = MemoryStore::new();
        let created = store.create(TodoDraft::new("once")).await;

        assert!(store.delete(created.id).await.is_ok());
        assert_eq!(
            store.delete(created.id).await,
            Err(StoreError::NotFound { id: created.id })
        );
    }

    #[tokio::test]
    async fn clear_resets_collection_and_counter() {
        let store = MemoryStore::new();
        store.create(TodoDraft::new("a")).await;
        store.create(TodoDraft::new("b")).await;

        store.clear().await;
        assert!(store.is_empty().await);
        assert_eq!(store.create(TodoDraft::new("c")).await.id, FIRST_ID);
    }

    #[tokio::test]
    async fn list_is_ordered_by_id() {
        let store = MemoryStore::new();
        for title in ["c", "a", "b"] {
            store.create(TodoDraft::new(title)).await;
        }
        let ids: Vec<TodoId> = store.list_all().await.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn stored_gauge_tracks_mutations() {
        let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();

        ::metrics::with_local_recorder(&recorder, || {
            runtime.block_on(async {
                let store = MemoryStore::new();
                let a = store.create(TodoDraft::new("a")).await;
                store.create(TodoDraft::new("b")).await;
                store.delete(a.id).await.unwrap();
            })
        });

        let rendered = handle.render();
        assert!(rendered.contains("todos_stored 1"), "{rendered}");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_get_distinct_ids() {
        let store = MemoryStore::shared();
        let handles: Vec<_> = (0..10)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.create(TodoDraft::new(format!("todo {i}"))).await })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().id);
        }
        ids.sort_unstable();
        ids.dedup();

        assert_eq!(ids, (1..=10).collect::<Vec<TodoId>>());
        assert_eq!(store.list_all().await.len(), 10);
    }
}
