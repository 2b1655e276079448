//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with `PostgreSQL` or memory store)
//!
//! Extractors:
//!
//! - [`SessionCart`] - the session's cart/wishlist store
//! - [`identity`] helpers - read and write the signed-in user ID

pub mod cart;
pub mod identity;
pub mod session;

pub use cart::SessionCart;
pub use identity::{clear_current_user, current_user, set_current_user, sign_out};
pub use session::create_session_layer;
