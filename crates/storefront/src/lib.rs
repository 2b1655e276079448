//! Hearth storefront library.
//!
//! Holds each shopper's cart and wishlist for the lifetime of their session,
//! mirrors both collections to durable per-user storage once they sign in,
//! and serves the HTMX cart and wishlist fragments.
//!
//! The binary in `main.rs` wires these modules together; the CLI reuses the
//! storage layer for maintenance commands.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod storage;
pub mod store;
