//! GoMarketplace Cart - the persisted shopping cart store.
//!
//! The store keeps the cart in memory, hands snapshots to UI code, and writes
//! the whole cart to a key-value store after every change so it survives app
//! restarts.
//!
//! # Architecture
//!
//! - [`storage`] - Async key-value port with in-memory and file backends
//! - [`store`] - [`CartStore`]: load on start, mutate, persist, notify
//! - [`provider`] - Explicit injection of a store into UI scopes
//! - [`subscription`] - Change callbacks invoked with each new snapshot
//! - [`config`] - Storage location loaded from environment variables
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use gomarketplace_cart::{CartProvider, CartStore, Scope, use_cart};
//! use gomarketplace_cart::storage::MemoryStore;
//!
//! # async fn demo() -> Result<(), gomarketplace_cart::CartError> {
//! let store = CartStore::new(Arc::new(MemoryStore::new()));
//! store.initialize().await;
//!
//! let root = Scope::root().provide(CartProvider::new(store));
//! let cart = use_cart(&root.child())?;
//! println!("{} lines", cart.products().await.len());
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod provider;
pub mod storage;
pub mod store;
pub mod subscription;

pub use config::{CartConfig, ConfigError};
pub use error::{CartError, Result, StorageError};
pub use provider::{CartProvider, Scope, use_cart};
pub use store::CartStore;
pub use subscription::Subscription;

pub use gomarketplace_core::{Cart, CartItem, NewCartItem, ProductId};
