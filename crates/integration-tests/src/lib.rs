//! Integration tests for GoMarketplace.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p gomarketplace-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - Carts surviving restarts on a real directory
//! - `cart_provider` - Scoped access to one shared cart
//!
//! This library holds the fixtures shared by the test files.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::Path;
use std::sync::Arc;

use rust_decimal::Decimal;

use gomarketplace_cart::CartStore;
use gomarketplace_cart::storage::FileStore;
use gomarketplace_core::{NewCartItem, ProductId, ProductIdError};

/// Build a catalog product payload.
///
/// # Errors
///
/// Returns an error if `id` is not a valid product id.
pub fn product(id: &str, title: &str, price_cents: i64) -> Result<NewCartItem, ProductIdError> {
    Ok(NewCartItem::new(
        ProductId::parse(id)?,
        title,
        format!("https://img.example/{id}.png"),
        Decimal::new(price_cents, 2),
    ))
}

/// Open and initialize a file-backed store in `dir`, as an app launch would.
pub async fn launch(dir: &Path) -> CartStore {
    let store = CartStore::new(Arc::new(FileStore::new(dir)));
    store.initialize().await;
    store
}
