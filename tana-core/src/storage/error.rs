//! Storage Errors
//!
//! TigerStyle: A missing record is not a fault. NotFound travels in-band
//! (`Ok(None)` / `Ok(false)`) at the contract; [`StorageError`] is reserved
//! for real backend failures and is never conflated with a missing id.

use thiserror::Error;

/// Result type for contract operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// A backend fault: connectivity, serialization, or engine failure.
///
/// Faults propagate to the caller unmasked. No retry happens at this layer;
/// any retry policy belongs to the transport client underneath.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not be reached or the connection was lost
    #[error("storage connection failed: {0}")]
    Connection(String),

    /// A stored record could not be encoded or decoded
    #[error("storage serialization failed: {0}")]
    Serialization(String),

    /// The underlying engine rejected or failed the operation
    #[error("storage backend failed: {0}")]
    Backend(String),
}

impl StorageError {
    /// Connection fault with context.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Serialization fault with context.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Engine fault with context.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_carries_context() {
        let err = StorageError::connection("refused");
        assert_eq!(err.to_string(), "storage connection failed: refused");

        let err = StorageError::serialization("bad json");
        assert_eq!(err.to_string(), "storage serialization failed: bad json");

        let err = StorageError::backend("table missing");
        assert_eq!(err.to_string(), "storage backend failed: table missing");
    }
}
