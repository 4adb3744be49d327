//! Cross-backend contract tests.
//!
//! The storage contract promises identical externally observable semantics
//! regardless of backend. The same scenarios run here against every
//! available backend: in-memory and SQLite unconditionally, Redis when
//! TEST_REDIS_URL points at a disposable server.

use tana_core::{
    ItemDraft, ItemFilter, ItemPatch, ItemStore, MemoryStore, Settings, SqliteStore, StorageKind,
    StorageProvider,
};

// =============================================================================
// Scenarios
// =============================================================================

/// The end-to-end lifecycle: create, partial-update, get, delete, and the
/// not-found signals around them. Requires an empty store.
async fn exercise_lifecycle(store: &dyn ItemStore) {
    // Absent id: NotFound in-band, not an error.
    assert_eq!(store.get_item(999_999).await.unwrap(), None);
    assert!(!store.delete_item(999_999).await.unwrap());

    let draft = ItemDraft::new("Laptop", 1200.50);
    draft.validate().expect("valid draft");
    let created = store.create_item(&draft).await.unwrap();
    assert_eq!(created.name, "Laptop");
    assert_eq!(created.description, None);
    assert_eq!(created.price, 1200.50);

    // Update only the name; the price must survive.
    let patch = ItemPatch::new().with_name("Laptop Pro");
    patch.validate().expect("valid patch");
    let updated = store
        .update_item(created.id, &patch)
        .await
        .unwrap()
        .expect("item exists");
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "Laptop Pro");
    assert_eq!(updated.price, 1200.50);

    let fetched = store.get_item(created.id).await.unwrap().expect("item exists");
    assert_eq!(fetched, updated);

    // Repeated reads with no intervening mutation are identical.
    assert_eq!(store.get_item(created.id).await.unwrap(), Some(fetched));

    assert!(store.delete_item(created.id).await.unwrap());
    assert_eq!(store.get_item(created.id).await.unwrap(), None);
    assert!(!store.delete_item(created.id).await.unwrap());

    // Updating a deleted id writes nothing.
    let gone = store
        .update_item(created.id, &ItemPatch::new().with_price(1.0))
        .await
        .unwrap();
    assert_eq!(gone, None);
}

/// Filtering rules: case-insensitive substring on name, inclusive minimum
/// price, intersection of both. Requires an empty store.
async fn exercise_filters(store: &dyn ItemStore) {
    for (name, price) in [("Apple", 10.0), ("Orange", 20.0), ("Pineapple", 30.0)] {
        store.create_item(&ItemDraft::new(name, price)).await.unwrap();
    }

    let unfiltered = store.list_items(&ItemFilter::new()).await.unwrap();
    assert_eq!(unfiltered.len(), 3);

    let mut apples = store
        .list_items(&ItemFilter::new().with_name_contains("apple"))
        .await
        .unwrap()
        .into_iter()
        .map(|item| item.name)
        .collect::<Vec<_>>();
    apples.sort();
    assert_eq!(apples, vec!["Apple", "Pineapple"]);

    let dear = store
        .list_items(&ItemFilter::new().with_min_price(25.0))
        .await
        .unwrap();
    assert_eq!(dear.len(), 1);
    assert_eq!(dear[0].name, "Pineapple");

    let both = store
        .list_items(&ItemFilter::new().with_name_contains("apple").with_min_price(25.0))
        .await
        .unwrap();
    assert_eq!(both.len(), 1);
    assert_eq!(both[0].name, "Pineapple");

    // Identical repeated listing.
    let again = store.list_items(&ItemFilter::new()).await.unwrap();
    assert_eq!(again.len(), unfiltered.len());
}

/// Id allocation: fresh, monotonic, never reused after deletion.
async fn exercise_id_allocation(store: &dyn ItemStore) {
    let first = store.create_item(&ItemDraft::new("First", 1.0)).await.unwrap();
    let second = store.create_item(&ItemDraft::new("Second", 2.0)).await.unwrap();
    assert!(second.id > first.id);

    assert!(store.delete_item(second.id).await.unwrap());
    let third = store.create_item(&ItemDraft::new("Third", 3.0)).await.unwrap();
    assert!(third.id > second.id);
}

fn init_logging() {
    let _ = tracing_subscriber::fmt().with_env_filter("info").try_init();
}

// =============================================================================
// In-Memory
// =============================================================================

#[tokio::test]
async fn test_memory_satisfies_contract() {
    init_logging();
    exercise_lifecycle(&MemoryStore::new()).await;
    exercise_filters(&MemoryStore::new()).await;
    exercise_id_allocation(&MemoryStore::new()).await;
}

// =============================================================================
// SQLite
// =============================================================================

async fn sqlite_store(dir: &tempfile::TempDir, name: &str) -> SqliteStore {
    let url = format!("sqlite://{}/{name}.db", dir.path().display());
    SqliteStore::connect(&url).await.expect("connect")
}

#[tokio::test]
async fn test_sqlite_satisfies_contract() {
    init_logging();
    let dir = tempfile::tempdir().expect("tempdir");

    let store = sqlite_store(&dir, "lifecycle").await;
    exercise_lifecycle(&store).await;
    store.close().await;

    let store = sqlite_store(&dir, "filters").await;
    exercise_filters(&store).await;
    store.close().await;

    let store = sqlite_store(&dir, "ids").await;
    exercise_id_allocation(&store).await;
    store.close().await;
}

// =============================================================================
// Redis (requires a disposable server)
// =============================================================================

fn test_redis_url() -> Option<String> {
    std::env::var("TEST_REDIS_URL").ok()
}

async fn flushed_redis_provider(url: &str) -> StorageProvider {
    let client = redis::Client::open(url).expect("valid redis url");
    let mut conn = client
        .get_connection_manager()
        .await
        .expect("redis reachable");
    let _: () = redis::cmd("FLUSHDB")
        .query_async(&mut conn)
        .await
        .expect("flushdb");

    let mut settings = Settings::for_kind(StorageKind::Redis);
    settings.redis_url = url.to_string();
    StorageProvider::start(&settings).await.expect("start")
}

#[tokio::test]
async fn test_redis_satisfies_contract() {
    init_logging();
    let Some(url) = test_redis_url() else {
        eprintln!("Skipping test: TEST_REDIS_URL not set");
        return;
    };

    let provider = flushed_redis_provider(&url).await;
    let store = provider.store().await.expect("shared client available");
    exercise_lifecycle(store.as_ref()).await;
    exercise_id_allocation(store.as_ref()).await;
    provider.shutdown().await;

    let provider = flushed_redis_provider(&url).await;
    let store = provider.store().await.expect("shared client available");
    exercise_filters(store.as_ref()).await;
    provider.shutdown().await;
}
