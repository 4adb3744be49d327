//! Tana Core Constants
//!
//! TigerStyle: Every limit and fixed name lives here, named by unit.

// =============================================================================
// Item Validation Limits
// =============================================================================

/// Minimum item name length in characters
pub const ITEM_NAME_CHARS_MIN: usize = 3;

/// Maximum item name length in characters
pub const ITEM_NAME_CHARS_MAX: usize = 50;

/// Maximum item description length in characters
pub const ITEM_DESCRIPTION_CHARS_MAX: usize = 200;

// =============================================================================
// Key-Value Backend Keys
// =============================================================================

/// Key prefix for serialized item records ("item:1", "item:2", ...)
pub const ITEM_KEY_PREFIX: &str = "item:";

/// Key holding the id allocation counter.
///
/// Lives outside [`ITEM_KEY_PREFIX`] so key scans never pick it up.
pub const ITEM_ID_COUNTER_KEY: &str = "next_item_id";

// =============================================================================
// Relational Backend Sizing
// =============================================================================

/// Maximum connections in the SQLite pool
pub const SQLITE_POOL_CONNECTIONS_MAX: u32 = 10;
