//! GoMarketplace Core - Shared cart types.
//!
//! This crate provides the types used across all GoMarketplace components:
//! - `cart` - The persisted cart store handed to UI code
//! - `cli` - Command-line front end for inspecting and editing a cart
//!
//! # Architecture
//!
//! The core crate contains only types and the pure cart rules - no I/O, no
//! storage access. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, cart line items and the cart quantity rules

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
