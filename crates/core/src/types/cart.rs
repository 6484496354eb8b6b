//! The cart itself: an ordered, id-unique list of lines.
//!
//! All quantity rules live here so the store only has to worry about
//! locking, persistence and notification.

use serde::{Deserialize, Serialize, Serializer};

use super::id::ProductId;
use super::item::{CartItem, NewCartItem};

/// A cart snapshot that breaks the cart invariants.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartInvariantError {
    /// Two lines share the same product id.
    #[error("duplicate cart line for product {0}")]
    DuplicateId(ProductId),
    /// A line has a quantity of zero.
    #[error("cart line for product {0} has zero quantity")]
    ZeroQuantity(ProductId),
}

/// Ordered cart lines. Insertion order is display order.
///
/// Invariants:
/// - no two lines share a [`ProductId`]
/// - every line has `quantity >= 1`; a line that would drop to 0 is removed
///
/// Serializes as a bare JSON array of [`CartItem`]. Deserialization rejects
/// arrays that break the invariants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<CartItem>")]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from lines, checking the invariants.
    ///
    /// # Errors
    ///
    /// Returns [`CartInvariantError`] on duplicate ids or zero quantities.
    pub fn from_items(items: Vec<CartItem>) -> Result<Self, CartInvariantError> {
        for (index, item) in items.iter().enumerate() {
            if item.quantity == 0 {
                return Err(CartInvariantError::ZeroQuantity(item.id.clone()));
            }
            if items.iter().take(index).any(|seen| seen.id == item.id) {
                return Err(CartInvariantError::DuplicateId(item.id.clone()));
            }
        }
        Ok(Self { items })
    }

    /// Lines in display order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a line by product id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == *id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Total units across all lines (the cart badge count).
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Add one unit of `product`.
    ///
    /// A product not yet in the cart is appended with quantity 1, whatever
    /// quantity the payload carries. An existing line is incremented and keeps
    /// its stored title, image and price.
    ///
    /// Returns the line's quantity after the change.
    pub fn add(&mut self, product: NewCartItem) -> u32 {
        if let Some(existing) = self.find_mut(product.id.as_str()) {
            existing.quantity = existing.quantity.saturating_add(1);
            return existing.quantity;
        }

        self.items.push(product.into_line());
        1
    }

    /// Add one unit to the line for `id`.
    ///
    /// Returns the new quantity, or `None` if no line matches.
    pub fn increment(&mut self, id: &str) -> Option<u32> {
        let line = self.find_mut(id)?;
        line.quantity = line.quantity.saturating_add(1);
        Some(line.quantity)
    }

    /// Remove one unit from the line for `id`, dropping the line at zero.
    ///
    /// Returns the remaining quantity (`Some(0)` when the line was removed),
    /// or `None` if no line matches.
    pub fn decrement(&mut self, id: &str) -> Option<u32> {
        let index = self.items.iter().position(|item| item.id == *id)?;
        let remaining = self.items.get(index)?.quantity.saturating_sub(1);

        if remaining == 0 {
            self.items.remove(index);
        } else if let Some(line) = self.items.get_mut(index) {
            line.quantity = remaining;
        }

        Some(remaining)
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|item| item.id == *id)
    }
}

impl TryFrom<Vec<CartItem>> for Cart {
    type Error = CartInvariantError;

    fn try_from(items: Vec<CartItem>) -> Result<Self, Self::Error> {
        Self::from_items(items)
    }
}

impl Serialize for Cart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartItem;
    type IntoIter = std::slice::Iter<'a, CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
