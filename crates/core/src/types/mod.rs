//! Core types for Hearth.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod item;
pub mod price;
pub mod product;

pub use id::*;
pub use item::{CartItem, WishListItem, cart_totals};
pub use price::{CurrencyCode, ParseCurrencyError, Price};
pub use product::{ProductImage, ProductRecord, ProductSnapshot, WishListRequest};
