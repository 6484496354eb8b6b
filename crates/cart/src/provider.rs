//! Explicit injection of the cart into UI code.
//!
//! The app root builds one [`CartStore`], wraps it in a [`CartProvider`], and
//! attaches it to a [`Scope`]. Screens receive their scope from their parent
//! and call [`use_cart`] to get the cart. There is no global lookup: a screen
//! outside any provided scope gets [`CartError::MissingProvider`].

use std::sync::Arc;

use gomarketplace_core::{CartItem, NewCartItem};

use crate::error::{CartError, Result};
use crate::store::CartStore;
use crate::subscription::Subscription;

/// Shared handle to a cart store.
///
/// This struct is cheaply cloneable via `Arc`; all clones drive the same cart.
#[derive(Debug, Clone)]
pub struct CartProvider {
    inner: Arc<CartStore>,
}

impl CartProvider {
    /// Wrap a store so it can be handed to UI scopes.
    #[must_use]
    pub fn new(store: CartStore) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// Get a reference to the underlying store.
    #[must_use]
    pub fn store(&self) -> &CartStore {
        &self.inner
    }

    /// Whether two handles drive the same store.
    #[must_use]
    pub fn same_store(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Snapshot of the cart lines in display order.
    pub async fn products(&self) -> Vec<CartItem> {
        self.inner.products().await
    }

    /// See [`CartStore::add_to_cart`].
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot could not be written.
    pub async fn add_to_cart(&self, product: NewCartItem) -> Result<u32> {
        self.inner.add_to_cart(product).await
    }

    /// See [`CartStore::increment`].
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot could not be written.
    pub async fn increment(&self, id: &str) -> Result<Option<u32>> {
        self.inner.increment(id).await
    }

    /// See [`CartStore::decrement`].
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot could not be written.
    pub async fn decrement(&self, id: &str) -> Result<Option<u32>> {
        self.inner.decrement(id).await
    }

    /// See [`CartStore::subscribe`].
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&[CartItem]) + Send + Sync + 'static,
    {
        self.inner.subscribe(listener)
    }

    /// See [`CartStore::unsubscribe`].
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        self.inner.unsubscribe(subscription)
    }
}

/// A node in the UI tree, carrying the cart provider visible at that point.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    provider: Option<CartProvider>,
}

impl Scope {
    /// Top of the UI tree. No cart is provided yet.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Child scope in which `provider` is visible. Replaces any provider
    /// inherited from this scope.
    #[must_use]
    pub fn provide(&self, provider: CartProvider) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// Child scope inheriting this scope's provider.
    #[must_use]
    pub fn child(&self) -> Self {
        self.clone()
    }

    /// The provider visible in this scope, if any.
    #[must_use]
    pub const fn provider(&self) -> Option<&CartProvider> {
        self.provider.as_ref()
    }
}

/// Get the cart visible in `scope`.
///
/// # Errors
///
/// Returns [`CartError::MissingProvider`] if no ancestor scope provided a cart.
pub fn use_cart(scope: &Scope) -> Result<CartProvider> {
    scope.provider.clone().ok_or(CartError::MissingProvider)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use gomarketplace_core::ProductId;

    use super::*;
    use crate::storage::MemoryStore;

    fn provider() -> CartProvider {
        CartProvider::new(CartStore::new(Arc::new(MemoryStore::new())))
    }

    #[test]
    fn test_use_cart_without_provider_fails() {
        let err = use_cart(&Scope::root().child()).unwrap_err();
        assert!(matches!(err, CartError::MissingProvider));
        assert!(err.to_string().contains("must be used within a CartProvider"));
    }

    #[test]
    fn test_descendants_share_provider() {
        let cart = provider();
        let root = Scope::root().provide(cart.clone());
        let grandchild = root.child().child();

        assert!(use_cart(&grandchild).unwrap().same_store(&cart));
    }

    #[test]
    fn test_nested_provider_wins() {
        let outer = provider();
        let inner = provider();
        let scope = Scope::root().provide(outer.clone()).provide(inner.clone());

        let found = use_cart(&scope).unwrap();
        assert!(found.same_store(&inner));
        assert!(!found.same_store(&outer));
    }

    #[tokio::test]
    async fn test_handle_mutations_reach_store() {
        let cart = provider();
        let scope = Scope::root().provide(cart.clone());
        let screen = use_cart(&scope.child()).unwrap();

        screen
            .add_to_cart(NewCartItem::new(
                ProductId::parse("1").unwrap(),
                "Shirt",
                "u",
                Decimal::new(10, 0),
            ))
            .await
            .unwrap();
        screen.increment("1").await.unwrap();

        assert_eq!(cart.products().await[0].quantity, 2);
        assert_eq!(cart.store().item_count().await, 2);
    }
}
