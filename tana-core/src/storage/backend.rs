//! ItemStore - The Storage Contract
//!
//! TigerStyle: One behavioral contract, three engines. Every backend must
//! produce identical externally observable semantics for filtering, partial
//! updates, id assignment, and not-found signaling.

use async_trait::async_trait;

use super::error::StorageResult;
use super::item::{Item, ItemDraft, ItemFilter, ItemId, ItemPatch};

/// The polymorphic storage contract every backend satisfies.
///
/// NotFound is a normal outcome, never an error: `get_item` and
/// `update_item` return `Ok(None)`, `delete_item` returns `Ok(false)`.
/// `Err(StorageError)` always means a backend fault.
///
/// Drafts and patches are validated by the caller before any method here is
/// invoked; backends assert that precondition rather than re-validate.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Exact lookup by id. No side effects.
    async fn get_item(&self, item_id: ItemId) -> StorageResult<Option<Item>>;

    /// Every stored item matching all supplied filter conditions.
    ///
    /// Result order is implementation-defined, except the relational
    /// backend which orders by id ascending.
    async fn list_items(&self, filter: &ItemFilter) -> StorageResult<Vec<Item>>;

    /// Allocate a fresh id, store the full record, return it.
    ///
    /// The id never collides with one previously or concurrently allocated
    /// by the same backend instance.
    async fn create_item(&self, draft: &ItemDraft) -> StorageResult<Item>;

    /// Merge the patch's present fields onto the stored record and persist
    /// the result, returning the merged record.
    ///
    /// Returns `Ok(None)` and performs no write when the id is absent.
    async fn update_item(&self, item_id: ItemId, patch: &ItemPatch) -> StorageResult<Option<Item>>;

    /// Remove the record if present; `true` when a record was actually
    /// removed.
    async fn delete_item(&self, item_id: ItemId) -> StorageResult<bool>;
}
