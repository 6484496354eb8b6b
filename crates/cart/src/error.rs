//! Error types for the cart store.
//!
//! Load-time failures never reach callers (the cart just starts empty), so
//! these surface only from mutations that fail to persist and from UI code
//! that looks up a cart outside a provider.

use thiserror::Error;

/// Errors raised by a key-value storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The key cannot be stored by this backend.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// Cart-level error type.
#[derive(Debug, Error)]
pub enum CartError {
    /// The accessor was used in a scope with no provider above it.
    #[error("use_cart must be used within a CartProvider")]
    MissingProvider,

    /// Writing the cart snapshot to storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Encoding the cart snapshot failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;
