//! MemoryStore - Ephemeral Backend
//!
//! TigerStyle: A disposable store. Dropping the instance drops the data.
//!
//! Backed by an ordered map plus a monotonic next-id counter, both behind
//! one `RwLock`. The intended deployment is one instance per logical
//! request (no cross-request sharing); the lock additionally makes id
//! allocation atomic if an instance ever is shared. Doubles as the test
//! stand-in for the durable backends.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::backend::ItemStore;
use super::error::StorageResult;
use super::item::{Item, ItemDraft, ItemFilter, ItemId, ItemPatch};

/// In-memory item store. Non-durable.
pub struct MemoryStore {
    inner: RwLock<MemoryInner>,
}

struct MemoryInner {
    items: BTreeMap<ItemId, Item>,
    next_id: ItemId,
}

impl MemoryStore {
    /// Create an empty store; ids start at 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryInner {
                items: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn get_item(&self, item_id: ItemId) -> StorageResult<Option<Item>> {
        let inner = self.inner.read().await;
        Ok(inner.items.get(&item_id).cloned())
    }

    async fn list_items(&self, filter: &ItemFilter) -> StorageResult<Vec<Item>> {
        let inner = self.inner.read().await;
        Ok(inner
            .items
            .values()
            .filter(|item| filter.matches(item))
            .cloned()
            .collect())
    }

    async fn create_item(&self, draft: &ItemDraft) -> StorageResult<Item> {
        // Precondition
        assert!(
            draft.validate().is_ok(),
            "draft must be validated before storage"
        );

        let mut inner = self.inner.write().await;
        let id = inner.next_id;
        inner.next_id += 1;

        let item = Item::from_draft(id, draft);
        let previous = inner.items.insert(id, item.clone());

        // Postcondition: monotonic allocation never lands on a live id
        assert!(previous.is_none(), "allocated id {id} must be unseen");

        Ok(item)
    }

    async fn update_item(&self, item_id: ItemId, patch: &ItemPatch) -> StorageResult<Option<Item>> {
        // Precondition
        assert!(
            patch.validate().is_ok(),
            "patch must be validated before storage"
        );

        let mut inner = self.inner.write().await;
        match inner.items.get(&item_id) {
            Some(current) => {
                let updated = current.apply_patch(patch);
                inner.items.insert(item_id, updated.clone());
                Ok(Some(updated))
            }
            None => Ok(None),
        }
    }

    async fn delete_item(&self, item_id: ItemId) -> StorageResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner.items.remove(&item_id).is_some())
    }
}

// =============================================================================
// Tests
// =============================================================================
