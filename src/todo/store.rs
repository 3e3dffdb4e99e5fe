//! In-memory list storage
//!
//! This module owns every list the service knows about, together with the
//! counter used to hand out new identifiers.

use crate::todo::model::{ListId, TodoList};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Lists {
    entries: HashMap<ListId, TodoList>,

    /// Last identifier handed out. Only ever incremented.
    last_id: ListId,
}

/// Shared handle to the list store
///
/// Cloning the handle is cheap; all clones see the same lists. Reads take a
/// shared lock and may run concurrently, writes are exclusive.
#[derive(Debug, Clone, Default)]
pub struct Store {
    lists: Arc<RwLock<Lists>>,
}

impl Store {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a list by identifier
    pub async fn get(&self, id: ListId) -> Option<TodoList> {
        self.lists.read().await.entries.get(&id).cloned()
    }

    /// Insert a new list under a freshly assigned identifier
    ///
    /// Any `id` already present on `list` is overwritten. Identifiers start
    /// at 1 and are never reused, even after the list is deleted.
    pub async fn create(&self, mut list: TodoList) -> ListId {
        let mut lists = self.lists.write().await;

        lists.last_id += 1;
        let id = lists.last_id;
        list.id = id;
        lists.entries.insert(id, list);

        tracing::info!(id, "List created");
        id
    }

    /// Overwrite the list stored under `list.id`
    ///
    /// Returns `false` and leaves the store untouched when no such list
    /// exists.
    pub async fn replace(&self, list: TodoList) -> bool {
        let mut lists = self.lists.write().await;

        match lists.entries.get_mut(&list.id) {
            Some(entry) => {
                *entry = list;
                true
            }
            None => {
                tracing::debug!(id = list.id, "Replace of unknown list ignored");
                false
            }
        }
    }

    /// Remove a list, returning whether it existed
    pub async fn delete(&self, id: ListId) -> bool {
        let removed = self.lists.write().await.entries.remove(&id).is_some();

        if removed {
            tracing::info!(id, "List deleted");
        }
        removed
    }

    /// Number of lists currently stored
    pub async fn len(&self) -> usize {
        self.lists.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_assigns_from_one() {
        let store = Store::new();

        assert_eq!(store.create(TodoList::new("a")).await, 1);
        assert_eq!(store.create(TodoList::new("b")).await, 2);
    }

    #[tokio::test]
    async fn create_ignores_client_id() {
        let store = Store::new();
        let mut list = TodoList::new("a");
        list.id = 42;

        let id = store.create(list).await;

        assert_eq!(id, 1);
        assert_eq!(store.get(1).await.unwrap().id, 1);
        assert!(store.get(42).await.is_none());
    }
}
