//! Error types for the storage layer.
//!
//! None of these reach a caller of the cart or wishlist API. They exist so the
//! storage and persistence layers can use `?` internally; the collection layer
//! logs them and falls back to an empty or unchanged collection.

use thiserror::Error;

/// Failure of a [`StorageMedium`](crate::storage::StorageMedium) operation.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The medium cannot be used at all (quota, disabled, poisoned).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The key cannot be used by this medium.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Underlying file I/O failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure while loading or saving a persisted collection.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The medium rejected the read or write.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The stored value is not a JSON array of the expected entity.
    #[error("Malformed persisted value: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
