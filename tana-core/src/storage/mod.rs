//! Storage - Contract Trait and Backend Implementations
//!
//! TigerStyle: One behavioral contract, swappable engines.
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
//! ```
//!
//! # Uniform Semantics
//!
//! Every backend observes the same externally visible rules:
//! - NotFound travels in-band: `Ok(None)` / `Ok(false)`, never an `Err`.
//! - Updates merge only the patch fields that are present.
//! - Filters intersect; name matching is a case-insensitive substring,
//!   the price bound is inclusive.
//! - Ids are backend-assigned, monotonic, and never reused within one
//!   backend instance's lifetime.

mod backend;
mod error;
mod item;
mod memory;
mod redis;
mod sqlite;

pub use backend::ItemStore;
pub use error::{StorageError, StorageResult};
pub use item::{Item, ItemDraft, ItemFilter, ItemId, ItemPatch, ValidationError};
pub use memory::MemoryStore;
pub use redis::RedisStore;
pub use sqlite::SqliteStore;
