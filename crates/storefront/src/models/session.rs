//! Session-related types.
//!
//! Keys for the values the storefront keeps in the tower-sessions store.

/// Session keys.
pub mod keys {
    /// Key for the signed-in user's ID, written by the identity provider integration.
    pub const CURRENT_USER_ID: &str = "current_user_id";

    /// Key marking when the session's cart store was first opened.
    pub const STORE_OPENED_AT: &str = "store_opened_at";
}
