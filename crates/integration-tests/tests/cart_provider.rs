//! Integration tests for scoped cart access.
//!
//! These tests wire a store into a small scope tree the way the app root
//! does, then drive it from "screens" that only see their scope.

use std::sync::{Arc, Mutex};

use gomarketplace_cart::{CartError, CartProvider, Scope, use_cart};
use gomarketplace_integration_tests::{launch, product};

#[test]
fn test_screen_outside_provider_fails() {
    let root = Scope::root();
    let settings_screen = root.child();

    let err = use_cart(&settings_screen).unwrap_err();
    assert!(matches!(err, CartError::MissingProvider));
    assert_eq!(
        err.to_string(),
        "use_cart must be used within a CartProvider"
    );
}

#[tokio::test]
async fn test_catalog_and_cart_screens_share_one_cart() {
    let dir = tempfile::tempdir().unwrap();
    let provider = CartProvider::new(launch(dir.path()).await);
    let app = Scope::root().provide(provider);

    let catalog = use_cart(&app.child()).unwrap();
    let cart_screen = use_cart(&app.child().child()).unwrap();

    // Re-render log for the cart screen
    let renders = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&renders);
    cart_screen.subscribe(move |items| {
        log.lock().unwrap().push(items.len());
    });

    catalog.add_to_cart(product("1", "Shirt", 1000).unwrap()).await.unwrap();
    catalog.add_to_cart(product("2", "Hat", 500).unwrap()).await.unwrap();
    cart_screen.decrement("1").await.unwrap();

    assert_eq!(*renders.lock().unwrap(), vec![1, 2, 1]);

    let products = cart_screen.products().await;
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].id.as_str(), "2");
}

#[tokio::test]
async fn test_scenario_add_increment_decrement() {
    let dir = tempfile::tempdir().unwrap();
    let app = Scope::root().provide(CartProvider::new(launch(dir.path()).await));
    let cart = use_cart(&app).unwrap();

    let mut shirt = product("1", "Shirt", 1000).unwrap();
    shirt.quantity = Some(42);
    cart.add_to_cart(shirt).await.unwrap();

    let products = cart.products().await;
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].quantity, 1);
    assert_eq!(products[0].image_url, "https://img.example/1.png");

    assert_eq!(cart.increment("1").await.unwrap(), Some(2));
    assert_eq!(cart.decrement("1").await.unwrap(), Some(1));
    assert_eq!(cart.decrement("1").await.unwrap(), Some(0));
    assert!(cart.products().await.is_empty());

    // Decrementing a line that is gone changes nothing
    assert_eq!(cart.decrement("1").await.unwrap(), None);
}
