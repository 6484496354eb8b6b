//! Cart commands.
//!
//! Each command runs against an initialized store, applies at most one
//! mutation (which persists the cart), and prints the resulting cart.

use gomarketplace_cart::{CartError, CartStore, ConfigError};
use gomarketplace_core::{CartItem, NewCartItem};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Rendering JSON output failed.
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

/// How the cart is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Table,
    Json,
}

/// Print the cart.
pub async fn list(store: &CartStore, output: Output) -> Result<(), CommandError> {
    print_cart(&store.products().await, output)
}

/// Print the total number of units.
#[allow(clippy::print_stdout)]
pub async fn count(store: &CartStore) {
    println!("{}", store.item_count().await);
}

/// Add one unit of a product and print the cart.
pub async fn add(
    store: &CartStore,
    product: NewCartItem,
    output: Output,
) -> Result<(), CommandError> {
    let id = product.id.clone();
    let quantity = store.add_to_cart(product).await?;
    tracing::info!(product_id = %id, quantity, "Added to cart");
    print_cart(&store.products().await, output)
}

/// Add one unit to a line and print the cart.
pub async fn increment(store: &CartStore, id: &str, output: Output) -> Result<(), CommandError> {
    match store.increment(id).await? {
        Some(quantity) => tracing::info!(product_id = %id, quantity, "Incremented"),
        None => tracing::warn!(product_id = %id, "No cart line for product"),
    }
    print_cart(&store.products().await, output)
}

/// Remove one unit from a line and print the cart.
pub async fn decrement(store: &CartStore, id: &str, output: Output) -> Result<(), CommandError> {
    match store.decrement(id).await? {
        Some(0) => tracing::info!(product_id = %id, "Removed from cart"),
        Some(quantity) => tracing::info!(product_id = %id, quantity, "Decremented"),
        None => tracing::warn!(product_id = %id, "No cart line for product"),
    }
    print_cart(&store.products().await, output)
}

#[allow(clippy::print_stdout)]
fn print_cart(items: &[CartItem], output: Output) -> Result<(), CommandError> {
    match output {
        Output::Json => println!("{}", serde_json::to_string_pretty(items)?),
        Output::Table => print!("{}", render_table(items)),
    }
    Ok(())
}

/// Render cart lines as a fixed-width table.
fn render_table(items: &[CartItem]) -> String {
    if items.is_empty() {
        return "Cart is empty\n".to_string();
    }

    let id_width = items
        .iter()
        .map(|item| item.id.as_str().chars().count())
        .max()
        .unwrap_or(0)
        .max("ID".len());

    let mut table = format!("{:<id_width$}  {:>5}  {:>10}  TITLE\n", "ID", "QTY", "PRICE");
    for item in items {
        table.push_str(&format!(
            "{:<id_width$}  {:>5}  {:>10}  {}\n",
            item.id.as_str(),
            item.quantity,
            item.price.to_string(),
            item.title
        ));
    }
    table
}
