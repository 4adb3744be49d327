//! Tana Core - Item Storage with Swappable Backends
//!
//! TigerStyle: One storage contract, three engines, identical observable
//! semantics.
//!
//! The process picks its backend once at startup: an ephemeral in-memory
//! map, a file-backed SQLite database, or a remote Redis server. Whatever
//! the choice, callers see the same filtering rules, partial-update rules,
//! id assignment rules, and not-found signaling.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ItemStore Trait                         │
//! └─────────────────────────────────────────────────────────────┘
//!          ↑                    ↑                    ↑
//! ┌────────┴────────┐  ┌───────┴────────┐  ┌────────┴────────┐
//! │   MemoryStore   │  │  SqliteStore   │  │   RedisStore    │
//! │  (per request)  │  │ (shared pool)  │  │ (shared client) │
//! └─────────────────┘  └────────────────┘  └─────────────────┘
//!          ↑                    ↑                    ↑
//! ┌────────┴────────────────────┴────────────────────┴─────────┐
//! │          StorageProvider (selection + lifecycle)            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use tana_core::{ItemDraft, ItemPatch, Settings, StorageProvider};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::from_env()?;
//! let provider = StorageProvider::start(&settings).await?;
//!
//! // One contract instance per logical request.
//! let store = provider.store().await?;
//!
//! let draft = ItemDraft::new("Laptop", 1200.50);
//! draft.validate()?;
//! let item = store.create_item(&draft).await?;
//!
//! let patch = ItemPatch::new().with_name("Laptop Pro");
//! patch.validate()?;
//! let updated = store.update_item(item.id, &patch).await?;
//! assert!(updated.is_some());
//!
//! provider.shutdown().await;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Taxonomy
//!
//! - NotFound: in-band (`Ok(None)` / `Ok(false)`), an expected outcome.
//! - [`ValidationError`]: a bad draft or patch, rejected before storage.
//! - [`StorageError`]: a backend fault, propagated unmasked.
//! - [`ConfigError`]: an unrecognized backend selection, fatal at startup.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod constants;
pub mod provider;
pub mod storage;

// Re-export common types
pub use config::{ConfigError, Settings, StorageKind};
pub use constants::*;
pub use provider::StorageProvider;
pub use storage::{
    Item, ItemDraft, ItemFilter, ItemId, ItemPatch, ItemStore, MemoryStore, RedisStore,
    SqliteStore, StorageError, StorageResult, ValidationError,
};
