//! StorageProvider - Backend Selection and Lifecycle
//!
//! TigerStyle: Every long-lived backend handle has exactly one owner.
//!
//! The provider reads the backend selection once at startup and owns the
//! stateful handles for the lifetime of the process:
//! - in-memory: no shared state; every request gets a fresh, isolated
//!   instance
//! - sqlite: one connection pool, schema initialized before the first
//!   request
//! - redis: one client with a lazily-connected, multiplexed manager shared
//!   by all requests
//!
//! A Redis server that is down at startup does not abort the process: the
//! ping failure is logged and connection is retried on first use, where a
//! still-unreachable server surfaces as a per-call connection fault.

use redis::aio::ConnectionManager;
use sqlx::sqlite::SqlitePool;
use tokio::sync::RwLock;

use crate::config::{Settings, StorageKind};
use crate::storage::{ItemStore, MemoryStore, RedisStore, SqliteStore, StorageError, StorageResult};

// =============================================================================
// Redis Handle
// =============================================================================

/// The shared Redis client with its lazily-initialized connection manager.
struct RedisHandle {
    client: redis::Client,
    manager: RwLock<Option<ConnectionManager>>,
}

impl RedisHandle {
    fn new(client: redis::Client) -> Self {
        Self {
            client,
            manager: RwLock::new(None),
        }
    }

    /// Get the shared manager, connecting on first use.
    async fn manager(&self) -> StorageResult<ConnectionManager> {
        {
            let guard = self.manager.read().await;
            if let Some(manager) = guard.as_ref() {
                return Ok(manager.clone());
            }
        }

        let mut guard = self.manager.write().await;
        // Another caller may have connected while we waited for the lock.
        if let Some(manager) = guard.as_ref() {
            return Ok(manager.clone());
        }

        let manager = self
            .client
            .get_connection_manager()
            .await
            .map_err(|e| StorageError::connection(format!("failed to connect to redis: {e}")))?;
        *guard = Some(manager.clone());
        Ok(manager)
    }

    async fn close(&self) {
        let mut guard = self.manager.write().await;
        if guard.take().is_some() {
            tracing::info!("redis connection closed");
        }
    }
}

// =============================================================================
// StorageProvider
// =============================================================================

enum ProviderInner {
    InMemory,
    Sqlite(SqlitePool),
    Redis(RedisHandle),
}

/// Selects the active backend at startup and owns its shared handles.
pub struct StorageProvider {
    inner: ProviderInner,
}

impl StorageProvider {
    /// Start the backend named by `settings.storage`.
    ///
    /// The selection is read once; switching at runtime is not supported.
    /// For SQLite this connects the pool and runs the idempotent schema
    /// setup. For Redis this builds the client and probes the server; a
    /// failed probe degrades to lazy connection instead of aborting.
    ///
    /// # Errors
    /// Returns a connection fault for an unusable SQLite database or a
    /// malformed Redis URL.
    pub async fn start(settings: &Settings) -> StorageResult<Self> {
        let inner = match settings.storage {
            StorageKind::InMemory => {
                tracing::info!("storage backend: in-memory (non-durable)");
                ProviderInner::InMemory
            }
            StorageKind::Sqlite => {
                tracing::info!(url = %settings.sqlite_url, "storage backend: sqlite");
                let store = SqliteStore::connect(&settings.sqlite_url).await?;
                ProviderInner::Sqlite(store.pool().clone())
            }
            StorageKind::Redis => {
                tracing::info!(url = %settings.redis_url, "storage backend: redis");
                let client = redis::Client::open(settings.redis_url.as_str())
                    .map_err(|e| StorageError::connection(format!("invalid redis url: {e}")))?;
                let handle = RedisHandle::new(client);

                match handle.manager().await {
                    Ok(mut conn) => match redis::cmd("PING").query_async::<_, String>(&mut conn).await {
                        Ok(_) => tracing::info!("redis connection established"),
                        Err(e) => tracing::warn!("redis ping failed: {e}"),
                    },
                    Err(e) => {
                        tracing::warn!("redis unreachable at startup, retrying on first use: {e}");
                    }
                }
                ProviderInner::Redis(handle)
            }
        };

        Ok(Self { inner })
    }

    /// Which backend this provider serves.
    #[must_use]
    pub fn kind(&self) -> StorageKind {
        match &self.inner {
            ProviderInner::InMemory => StorageKind::InMemory,
            ProviderInner::Sqlite(_) => StorageKind::Sqlite,
            ProviderInner::Redis(_) => StorageKind::Redis,
        }
    }

    /// Hand out the contract instance for one logical request.
    ///
    /// In-memory: a fresh, isolated store per call — callers must not hold
    /// one across requests. SQLite: a stateless handle over the shared
    /// pool. Redis: a handle over the one shared client, connecting it
    /// here if startup degraded.
    ///
    /// # Errors
    /// Returns a connection fault when a lazily-connected Redis manager
    /// still cannot reach the server.
    pub async fn store(&self) -> StorageResult<Box<dyn ItemStore>> {
        match &self.inner {
            ProviderInner::InMemory => Ok(Box::new(MemoryStore::new())),
            ProviderInner::Sqlite(pool) => Ok(Box::new(SqliteStore::from_pool(pool.clone()))),
            ProviderInner::Redis(handle) => Ok(Box::new(RedisStore::new(handle.manager().await?))),
        }
    }

    /// Release the handles that were actually started.
    pub async fn shutdown(&self) {
        match &self.inner {
            ProviderInner::InMemory => {}
            ProviderInner::Sqlite(pool) => {
                pool.close().await;
                tracing::info!("sqlite pool closed");
            }
            ProviderInner::Redis(handle) => handle.close().await,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{ItemDraft, ItemFilter};

    #[tokio::test]
    async fn test_in_memory_stores_are_isolated_per_request() {
        let settings = Settings::for_kind(StorageKind::InMemory);
        let provider = StorageProvider::start(&settings).await.unwrap();
        assert_eq!(provider.kind(), StorageKind::InMemory);

        let first = provider.store().await.unwrap();
        let created = first.create_item(&ItemDraft::new("Ephemeral", 1.0)).await.unwrap();

        // A second logical request sees a fresh instance.
        let second = provider.store().await.unwrap();
        assert_eq!(second.get_item(created.id).await.unwrap(), None);

        provider.shutdown().await;
    }

    #[tokio::test]
    async fn test_sqlite_stores_share_one_pool() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut settings = Settings::for_kind(StorageKind::Sqlite);
        settings.sqlite_url = format!("sqlite://{}/items.db", dir.path().display());

        let provider = StorageProvider::start(&settings).await.unwrap();
        assert_eq!(provider.kind(), StorageKind::Sqlite);

        let first = provider.store().await.unwrap();
        let created = first.create_item(&ItemDraft::new("Durable", 2.0)).await.unwrap();

        // A second request handle reaches the same database.
        let second = provider.store().await.unwrap();
        let fetched = second.get_item(created.id).await.unwrap();
        assert_eq!(fetched, Some(created));

        provider.shutdown().await;
    }

    #[tokio::test]
    async fn test_redis_start_degrades_when_server_is_down() {
        // Nothing listens on this port; startup must still succeed.
        let mut settings = Settings::for_kind(StorageKind::Redis);
        settings.redis_url = "redis://127.0.0.1:1/0".to_string();

        let provider = StorageProvider::start(&settings).await.unwrap();
        assert_eq!(provider.kind(), StorageKind::Redis);

        // First use retries the connection and surfaces the fault per-call.
        let result = provider.store().await;
        assert!(matches!(result, Err(StorageError::Connection(_))));

        provider.shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_closes_sqlite_pool() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut settings = Settings::for_kind(StorageKind::Sqlite);
        settings.sqlite_url = format!("sqlite://{}/items.db", dir.path().display());

        let provider = StorageProvider::start(&settings).await.unwrap();
        let store = provider.store().await.unwrap();
        store.create_item(&ItemDraft::new("Closing", 3.0)).await.unwrap();
        provider.shutdown().await;

        // The pool is closed; further operations fail as faults.
        let store = provider.store().await.unwrap();
        assert!(store.list_items(&ItemFilter::new()).await.is_err());
    }
}
