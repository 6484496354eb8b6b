//! Key-value storage for the persisted cart blob.
//!
//! The cart is stored as one text value under one fixed key, overwritten in
//! full on every change. Backends only need string get/set/remove.
//!
//! # Backends
//!
//! - [`MemoryStore`] - In-process map, for tests and throwaway sessions
//! - [`FileStore`] - One file per key in a local directory

use async_trait::async_trait;

use crate::error::StorageError;

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Key the cart blob is stored under unless configured otherwise.
pub const CART_STORAGE_KEY: &str = "@GoMarketplace:products";

/// Async string key-value store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if nothing is stored.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value under `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
