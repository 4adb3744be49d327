//! Configuration
//!
//! TigerStyle: The backend selection is read once, before any backend is
//! constructed. An unrecognized selection halts startup; it never falls back
//! silently to a working backend. Switching the selection at runtime is not
//! supported.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Environment Variables
// =============================================================================

/// Variable naming the active backend (`in_memory`, `sqlite`, `redis`)
pub const ENV_STORAGE_TYPE: &str = "STORAGE_TYPE";

/// Variable holding the SQLite database URL
pub const ENV_SQLITE_DATABASE_URL: &str = "SQLITE_DATABASE_URL";

/// Variable holding the Redis server URL
pub const ENV_REDIS_URL: &str = "REDIS_URL";

/// Backend used when [`ENV_STORAGE_TYPE`] is absent
pub const STORAGE_KIND_DEFAULT: StorageKind = StorageKind::InMemory;

/// SQLite database URL used when [`ENV_SQLITE_DATABASE_URL`] is absent
pub const SQLITE_DATABASE_URL_DEFAULT: &str = "sqlite://tana.db";

/// Redis URL used when [`ENV_REDIS_URL`] is absent
pub const REDIS_URL_DEFAULT: &str = "redis://localhost:6379/0";

// =============================================================================
// Storage Kind
// =============================================================================

/// The storage backend variants a process can run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    /// Ephemeral map, one instance per logical request
    InMemory,
    /// File-backed relational store behind a connection pool
    Sqlite,
    /// Remote key-value store behind one shared client
    Redis,
}

impl StorageKind {
    /// Get string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InMemory => "in_memory",
            Self::Sqlite => "sqlite",
            Self::Redis => "redis",
        }
    }

    /// Parse from string.
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "in_memory" => Some(Self::InMemory),
            "sqlite" => Some(Self::Sqlite),
            "redis" => Some(Self::Redis),
            _ => None,
        }
    }

    /// Get all storage kinds in order.
    #[must_use]
    pub fn all() -> &'static [StorageKind] {
        &[Self::InMemory, Self::Sqlite, Self::Redis]
    }
}

impl std::fmt::Display for StorageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Configuration failure. Fatal at startup/selection time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The configured backend name matches no [`StorageKind`].
    #[error("unknown storage backend {0:?}; expected one of: in_memory, sqlite, redis")]
    UnknownBackend(String),
}

// =============================================================================
// Settings
// =============================================================================

/// Process-wide settings, read once before backend selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Which backend serves this process
    pub storage: StorageKind,
    /// SQLite database URL (file-backed; created on first use)
    pub sqlite_url: String,
    /// Redis server URL
    pub redis_url: String,
}

impl Settings {
    /// Load settings from the environment, honoring a `.env` file if present.
    ///
    /// Absent variables fall back to their defaults; an unrecognized
    /// [`ENV_STORAGE_TYPE`] value is a hard failure.
    ///
    /// # Errors
    /// Returns [`ConfigError::UnknownBackend`] for an unrecognized selection.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let storage = match std::env::var(ENV_STORAGE_TYPE) {
            Ok(value) => StorageKind::from_str(&value).ok_or(ConfigError::UnknownBackend(value))?,
            Err(_) => STORAGE_KIND_DEFAULT,
        };

        let sqlite_url = std::env::var(ENV_SQLITE_DATABASE_URL)
            .unwrap_or_else(|_| SQLITE_DATABASE_URL_DEFAULT.to_string());
        let redis_url =
            std::env::var(ENV_REDIS_URL).unwrap_or_else(|_| REDIS_URL_DEFAULT.to_string());

        Ok(Self {
            storage,
            sqlite_url,
            redis_url,
        })
    }

    /// Settings for a given backend with default connection parameters.
    #[must_use]
    pub fn for_kind(storage: StorageKind) -> Self {
        Self {
            storage,
            sqlite_url: SQLITE_DATABASE_URL_DEFAULT.to_string(),
            redis_url: REDIS_URL_DEFAULT.to_string(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::for_kind(STORAGE_KIND_DEFAULT)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_kind_as_str() {
        assert_eq!(StorageKind::InMemory.as_str(), "in_memory");
        assert_eq!(StorageKind::Sqlite.as_str(), "sqlite");
        assert_eq!(StorageKind::Redis.as_str(), "redis");
    }

    #[test]
    fn test_storage_kind_from_str() {
        assert_eq!(StorageKind::from_str("in_memory"), Some(StorageKind::InMemory));
        assert_eq!(StorageKind::from_str("SQLITE"), Some(StorageKind::Sqlite));
        assert_eq!(StorageKind::from_str("Redis"), Some(StorageKind::Redis));
        assert_eq!(StorageKind::from_str("mongodb"), None);
        assert_eq!(StorageKind::from_str(""), None);
    }

    #[test]
    fn test_storage_kind_all_roundtrip() {
        for kind in StorageKind::all() {
            assert_eq!(StorageKind::from_str(kind.as_str()), Some(*kind));
        }
    }

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.storage, StorageKind::InMemory);
        assert_eq!(settings.sqlite_url, SQLITE_DATABASE_URL_DEFAULT);
        assert_eq!(settings.redis_url, REDIS_URL_DEFAULT);
    }

    // One test owns every env mutation: the process environment is shared
    // across the parallel test harness.
    #[test]
    fn test_settings_from_env() {
        std::env::remove_var(ENV_STORAGE_TYPE);
        let settings = Settings::from_env().expect("defaults must parse");
        assert_eq!(settings.storage, STORAGE_KIND_DEFAULT);

        std::env::set_var(ENV_STORAGE_TYPE, "redis");
        std::env::set_var(ENV_REDIS_URL, "redis://example:6379/1");
        let settings = Settings::from_env().expect("redis selection must parse");
        assert_eq!(settings.storage, StorageKind::Redis);
        assert_eq!(settings.redis_url, "redis://example:6379/1");

        std::env::set_var(ENV_STORAGE_TYPE, "filesystem");
        let err = Settings::from_env().expect_err("unknown selection must fail");
        assert_eq!(err, ConfigError::UnknownBackend("filesystem".to_string()));

        std::env::remove_var(ENV_STORAGE_TYPE);
        std::env::remove_var(ENV_REDIS_URL);
    }
}
