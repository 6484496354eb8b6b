//! Core types for GoMarketplace.
//!
//! This module provides type-safe wrappers for the cart domain.

pub mod cart;
pub mod id;
pub mod item;

pub use cart::{Cart, CartInvariantError};
pub use id::{ProductId, ProductIdError};
pub use item::{CartItem, NewCartItem};
