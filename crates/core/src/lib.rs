//! Hearth Core - Shared domain types.
//!
//! This crate provides the types used across all Hearth components:
//! - `storefront` - Public-facing shop with the cart/wishlist store
//! - `cli` - Command-line tools for migrations and storage maintenance
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Typed identifiers, prices, products, and cart/wishlist entries

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
