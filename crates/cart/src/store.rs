//! The cart store.
//!
//! [`CartStore`] owns the in-memory cart, loads the persisted snapshot once
//! (at `initialize` or on the first mutation, whichever comes first), and after
//! every mutation notifies subscribers and overwrites the persisted snapshot
//! with the full cart.
//!
//! # Ordering
//!
//! Mutations are serialized by an async mutex that stays held while the
//! snapshot is written, so each write reflects exactly one mutation and
//! writes land in call order.
//!
//! # Failure Handling
//!
//! - A missing, unreadable or invalid snapshot at startup leaves the cart
//!   empty. This is logged, never returned.
//! - A failed write keeps the in-memory change (subscribers have already seen
//!   it), logs the failure, and returns the error to the caller. Nothing is
//!   retried; the next successful mutation rewrites the full cart.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;
use tracing::instrument;

use gomarketplace_core::{Cart, CartItem, NewCartItem};

use crate::config::CartConfig;
use crate::error::Result;
use crate::storage::{CART_STORAGE_KEY, FileStore, KeyValueStore};
use crate::subscription::{Subscribers, Subscription};

/// In-memory cart persisted to a key-value store.
pub struct CartStore {
    storage: Arc<dyn KeyValueStore>,
    key: String,
    cart: Mutex<Cart>,
    initialized: AtomicBool,
    subscribers: Subscribers,
}

impl CartStore {
    /// Create an empty store persisting under [`CART_STORAGE_KEY`].
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(storage, CART_STORAGE_KEY)
    }

    /// Create an empty store persisting under a custom key.
    #[must_use]
    pub fn with_key(storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            cart: Mutex::new(Cart::new()),
            initialized: AtomicBool::new(false),
            subscribers: Subscribers::default(),
        }
    }

    /// Create a file-backed store from configuration.
    #[must_use]
    pub fn from_config(config: &CartConfig) -> Self {
        let storage = Arc::new(FileStore::new(&config.storage_dir));
        Self::with_key(storage, config.storage_key.clone())
    }

    /// Key the snapshot is stored under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether [`Self::initialize`] has run.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Load the persisted snapshot into memory.
    ///
    /// Runs once; later calls do nothing. Any failure leaves the cart empty.
    /// Subscribers are notified when a snapshot was loaded. A mutation made
    /// before this runs loads the snapshot itself first, so no earlier
    /// session's lines are overwritten.
    #[instrument(skip(self), fields(key = %self.key))]
    pub async fn initialize(&self) {
        let mut cart = self.cart.lock().await;

        if self.initialized.swap(true, Ordering::AcqRel) {
            tracing::debug!("Cart already initialized");
            return;
        }

        self.hydrate(&mut cart).await;
    }

    /// Replace `cart` with the persisted snapshot, if one can be read.
    ///
    /// Callers hold the cart lock and have just flipped `initialized`.
    async fn hydrate(&self, cart: &mut Cart) {
        match self.load().await {
            Ok(Some(loaded)) => {
                tracing::info!(
                    lines = loaded.len(),
                    units = loaded.item_count(),
                    "Loaded persisted cart"
                );
                *cart = loaded;
                self.subscribers.notify(cart.items());
            }
            Ok(None) => tracing::debug!("No persisted cart, starting empty"),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load persisted cart, starting empty");
            }
        }
    }

    /// Read the persisted snapshot without touching the in-memory cart.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read or the snapshot is not a
    /// valid cart.
    pub async fn load(&self) -> Result<Option<Cart>> {
        let Some(blob) = self.storage.get(&self.key).await? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&blob)?))
    }

    /// Snapshot of the cart lines in display order.
    pub async fn products(&self) -> Vec<CartItem> {
        self.cart.lock().await.items().to_vec()
    }

    /// Snapshot of the whole cart.
    pub async fn cart(&self) -> Cart {
        self.cart.lock().await.clone()
    }

    /// Total units in the cart.
    pub async fn item_count(&self) -> u64 {
        self.cart.lock().await.item_count()
    }

    /// Add one unit of `product`, appending a new line at quantity 1 if the
    /// product is not in the cart yet.
    ///
    /// Returns the line's quantity after the change.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot could not be written. The in-memory
    /// change is kept.
    #[instrument(skip(self, product), fields(key = %self.key, product_id = %product.id))]
    pub async fn add_to_cart(&self, product: NewCartItem) -> Result<u32> {
        self.mutate(|cart| cart.add(product)).await
    }

    /// Add one unit to the line for `id`.
    ///
    /// Returns the new quantity, or `None` if no line matches. The snapshot is
    /// written either way.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot could not be written.
    #[instrument(skip(self), fields(key = %self.key))]
    pub async fn increment(&self, id: &str) -> Result<Option<u32>> {
        self.mutate(|cart| cart.increment(id)).await
    }

    /// Remove one unit from the line for `id`, dropping the line at zero.
    ///
    /// Returns the remaining quantity (`Some(0)` when the line was removed),
    /// or `None` if no line matches.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot could not be written.
    #[instrument(skip(self), fields(key = %self.key))]
    pub async fn decrement(&self, id: &str) -> Result<Option<u32>> {
        self.mutate(|cart| cart.decrement(id)).await
    }

    /// Register a callback invoked with the cart lines after every change.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&[CartItem]) + Send + Sync + 'static,
    {
        self.subscribers.subscribe(Arc::new(listener))
    }

    /// Remove a callback. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        self.subscribers.unsubscribe(subscription)
    }

    async fn mutate<T>(&self, apply: impl FnOnce(&mut Cart) -> T) -> Result<T> {
        let mut cart = self.cart.lock().await;

        if !self.initialized.swap(true, Ordering::AcqRel) {
            tracing::debug!("Mutation before initialize, loading persisted cart first");
            self.hydrate(&mut cart).await;
        }

        let outcome = apply(&mut cart);
        self.subscribers.notify(cart.items());

        if let Err(e) = self.persist(&cart).await {
            tracing::error!(error = %e, "Failed to persist cart");
            return Err(e);
        }

        Ok(outcome)
    }

    async fn persist(&self, cart: &Cart) -> Result<()> {
        let blob = serde_json::to_string(cart)?;
        self.storage.set(&self.key, &blob).await?;
        tracing::debug!(lines = cart.len(), "Persisted cart");
        Ok(())
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.key)
            .field("initialized", &self.is_initialized())
            .field("subscribers", &self.subscribers)
            .finish_non_exhaustive()
    }
}
