//! SqliteStore - Relational Backend
//!
//! TigerStyle: Pooled connections, explicit schema, parameters always
//! bound.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS items (
//!     id INTEGER PRIMARY KEY AUTOINCREMENT,
//!     name TEXT NOT NULL,
//!     description TEXT,
//!     price REAL NOT NULL
//! );
//! ```
//!
//! `AUTOINCREMENT` keeps id allocation monotonic: a deleted id is never
//! handed out again. Each operation checks a connection out of the pool for
//! the duration of that call only; `list_items` always orders by id so
//! results are deterministic.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;

use crate::constants::SQLITE_POOL_CONNECTIONS_MAX;

use super::backend::ItemStore;
use super::error::{StorageError, StorageResult};
use super::item::{Item, ItemDraft, ItemFilter, ItemId, ItemPatch};

// =============================================================================
// SqliteStore
// =============================================================================

/// SQLite storage backend: file-backed, durable across instances.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect to `database_url` (e.g. `sqlite://tana.db`), creating the
    /// database file and schema if absent.
    ///
    /// # Errors
    /// Returns a connection fault if the URL is invalid or the pool cannot
    /// be created, and a backend fault if schema creation fails.
    pub async fn connect(database_url: &str) -> StorageResult<Self> {
        // Precondition
        assert!(!database_url.is_empty(), "database url cannot be empty");

        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| StorageError::connection(format!("invalid sqlite url: {e}")))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(SQLITE_POOL_CONNECTIONS_MAX)
            .connect_with(options)
            .await
            .map_err(|e| StorageError::connection(format!("failed to connect: {e}")))?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// Create from an existing pool. The schema must already exist.
    #[must_use]
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Initialize the schema. Idempotent; runs before the first request.
    async fn init_schema(&self) -> StorageResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                description TEXT,
                price REAL NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::backend(format!("failed to create schema: {e}")))?;

        Ok(())
    }

    /// Get the connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close all connections in the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

// =============================================================================
// Row Mapping
// =============================================================================

fn row_to_item(row: &SqliteRow) -> StorageResult<Item> {
    let id: ItemId = row
        .try_get("id")
        .map_err(|e| StorageError::serialization(e.to_string()))?;
    let name: String = row
        .try_get("name")
        .map_err(|e| StorageError::serialization(e.to_string()))?;
    let description: Option<String> = row
        .try_get("description")
        .map_err(|e| StorageError::serialization(e.to_string()))?;
    let price: f64 = row
        .try_get("price")
        .map_err(|e| StorageError::serialization(e.to_string()))?;

    Ok(Item {
        id,
        name,
        description,
        price,
    })
}

// =============================================================================
// ItemStore Implementation
// =============================================================================

#[async_trait]
impl ItemStore for SqliteStore {
    async fn get_item(&self, item_id: ItemId) -> StorageResult<Option<Item>> {
        let row = sqlx::query("SELECT id, name, description, price FROM items WHERE id = ?")
            .bind(item_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::backend(format!("failed to get item {item_id}: {e}")))?;

        match row {
            Some(row) => {
                let item = row_to_item(&row)?;
                // Postcondition
                assert_eq!(item.id, item_id, "returned item must match requested id");
                Ok(Some(item))
            }
            None => Ok(None),
        }
    }

    async fn list_items(&self, filter: &ItemFilter) -> StorageResult<Vec<Item>> {
        let mut sql = String::from("SELECT id, name, description, price FROM items WHERE 1=1");
        if filter.name_contains.is_some() {
            sql.push_str(" AND LOWER(name) LIKE LOWER(?)");
        }
        if filter.min_price.is_some() {
            sql.push_str(" AND price >= ?");
        }
        sql.push_str(" ORDER BY id");

        // Conditions and binds are appended in the same order; parameters
        // are never interpolated into the SQL text.
        let mut query = sqlx::query(&sql);
        if let Some(needle) = &filter.name_contains {
            query = query.bind(format!("%{needle}%"));
        }
        if let Some(min_price) = filter.min_price {
            query = query.bind(min_price);
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StorageError::backend(format!("failed to list items: {e}")))?;

        let mut items = Vec::with_capacity(rows.len());
        for row in &rows {
            items.push(row_to_item(row)?);
        }
        Ok(items)
    }

    async fn create_item(&self, draft: &ItemDraft) -> StorageResult<Item> {
        // Precondition
        assert!(
            draft.validate().is_ok(),
            "draft must be validated before storage"
        );

        let result = sqlx::query("INSERT INTO items (name, description, price) VALUES (?, ?, ?)")
            .bind(&draft.name)
            .bind(draft.description.as_deref())
            .bind(draft.price)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::backend(format!("failed to insert item: {e}")))?;

        let id = result.last_insert_rowid();

        // Postcondition
        assert!(id > 0, "sqlite must assign a positive rowid");

        Ok(Item::from_draft(id, draft))
    }

    async fn update_item(&self, item_id: ItemId, patch: &ItemPatch) -> StorageResult<Option<Item>> {
        // Precondition
        assert!(
            patch.validate().is_ok(),
            "patch must be validated before storage"
        );

        // One full-column update; COALESCE reproduces the merge semantics
        // of Item::apply_patch. Zero rows affected means the id is absent,
        // so no re-read happens.
        let result = sqlx::query(
            r"
            UPDATE items
            SET name = COALESCE(?, name),
                description = COALESCE(?, description),
                price = COALESCE(?, price)
            WHERE id = ?
            ",
        )
        .bind(patch.name.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.price)
        .bind(item_id)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::backend(format!("failed to update item {item_id}: {e}")))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_item(item_id).await
    }

    async fn delete_item(&self, item_id: ItemId) -> StorageResult<bool> {
        let result = sqlx::query("DELETE FROM items WHERE id = ?")
            .bind(item_id)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::backend(format!("failed to delete item {item_id}: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

// =============================================================================
// Tests
// =============================================================================
