//! RedisStore - Key-Value Backend
//!
//! TigerStyle: One shared client, server-side id allocation.
//!
//! Each item lives as a JSON record under `item:<id>`. Ids come from
//! `INCR next_item_id` — atomic on the server, so allocation stays safe
//! while one multiplexed client serves many concurrent requests. The
//! counter key sits outside the item prefix and is never scanned.
//!
//! Listing is a cursor `SCAN` over the prefix followed by one `MGET`;
//! filtering happens in application code with the same rules as every
//! other backend, and no ordering is guaranteed.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::constants::{ITEM_ID_COUNTER_KEY, ITEM_KEY_PREFIX};

use super::backend::ItemStore;
use super::error::{StorageError, StorageResult};
use super::item::{Item, ItemDraft, ItemFilter, ItemId, ItemPatch};

// =============================================================================
// RedisStore
// =============================================================================

/// Redis storage backend: durable records behind one shared, multiplexed
/// client.
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Wrap a shared connection manager. Cloning the manager is cheap; all
    /// clones multiplex over the same client.
    #[must_use]
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    fn item_key(item_id: ItemId) -> String {
        format!("{ITEM_KEY_PREFIX}{item_id}")
    }
}

// =============================================================================
// Record Codec
// =============================================================================

fn encode_item(item: &Item) -> StorageResult<String> {
    serde_json::to_string(item)
        .map_err(|e| StorageError::serialization(format!("failed to encode item {}: {e}", item.id)))
}

fn decode_item(payload: &str) -> StorageResult<Item> {
    serde_json::from_str(payload)
        .map_err(|e| StorageError::serialization(format!("failed to decode item record: {e}")))
}

// =============================================================================
// ItemStore Implementation
// =============================================================================

#[async_trait]
impl ItemStore for RedisStore {
    async fn get_item(&self, item_id: ItemId) -> StorageResult<Option<Item>> {
        let mut conn = self.conn.clone();
        let payload: Option<String> = conn
            .get(Self::item_key(item_id))
            .await
            .map_err(|e| StorageError::backend(format!("failed to get item {item_id}: {e}")))?;

        // A present key that fails to decode is a fault, not NotFound.
        match payload {
            Some(payload) => Ok(Some(decode_item(&payload)?)),
            None => Ok(None),
        }
    }

    async fn list_items(&self, filter: &ItemFilter) -> StorageResult<Vec<Item>> {
        let mut conn = self.conn.clone();

        let mut keys: Vec<String> = Vec::new();
        {
            let mut iter = conn
                .scan_match::<_, String>(format!("{ITEM_KEY_PREFIX}*"))
                .await
                .map_err(|e| StorageError::backend(format!("failed to scan item keys: {e}")))?;
            while let Some(key) = iter.next_item().await {
                keys.push(key);
            }
        }

        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let payloads: Vec<Option<String>> = conn
            .mget(&keys)
            .await
            .map_err(|e| StorageError::backend(format!("failed to fetch item records: {e}")))?;

        let mut items = Vec::with_capacity(payloads.len());
        for payload in payloads.into_iter().flatten() {
            let item = decode_item(&payload)?;
            if filter.matches(&item) {
                items.push(item);
            }
        }
        Ok(items)
    }

    async fn create_item(&self, draft: &ItemDraft) -> StorageResult<Item> {
        // Precondition
        assert!(
            draft.validate().is_ok(),
            "draft must be validated before storage"
        );

        let mut conn = self.conn.clone();

        // Server-side INCR: the one place cross-call atomicity is required,
        // since this client is shared by concurrent requests.
        let id: ItemId = conn
            .incr(ITEM_ID_COUNTER_KEY, 1)
            .await
            .map_err(|e| StorageError::backend(format!("failed to allocate item id: {e}")))?;

        // Postcondition
        assert!(id > 0, "id counter must be positive");

        let item = Item::from_draft(id, draft);
        let payload = encode_item(&item)?;
        let _: () = conn
            .set(Self::item_key(id), payload)
            .await
            .map_err(|e| StorageError::backend(format!("failed to store item {id}: {e}")))?;

        Ok(item)
    }

    /// Read-modify-write, not compare-and-swap: two concurrent updates to
    /// the same id merge against the same snapshot and the later `SET`
    /// wins, dropping the earlier writer's fields. Accepted limitation of
    /// this backend; the contract does not promise atomic updates here.
    async fn update_item(&self, item_id: ItemId, patch: &ItemPatch) -> StorageResult<Option<Item>> {
        // Precondition
        assert!(
            patch.validate().is_ok(),
            "patch must be validated before storage"
        );

        let current = match self.get_item(item_id).await? {
            Some(current) => current,
            None => return Ok(None),
        };

        let updated = current.apply_patch(patch);
        let payload = encode_item(&updated)?;

        let mut conn = self.conn.clone();
        let _: () = conn
            .set(Self::item_key(item_id), payload)
            .await
            .map_err(|e| StorageError::backend(format!("failed to store item {item_id}: {e}")))?;

        Ok(Some(updated))
    }

    async fn delete_item(&self, item_id: ItemId) -> StorageResult<bool> {
        let mut conn = self.conn.clone();
        let removed: i64 = conn
            .del(Self::item_key(item_id))
            .await
            .map_err(|e| StorageError::backend(format!("failed to delete item {item_id}: {e}")))?;

        Ok(removed > 0)
    }
}

// =============================================================================
// Tests (require running Redis)
// =============================================================================
