//! Signed-in user identity.
//!
//! The external identity provider's integration records the user ID in the
//! session after sign-in. Everything else in the storefront only reads it:
//! a session without a user ID is treated as unauthenticated.

use tower_sessions::Session;

use hearth_core::UserId;

use crate::models::session_keys;
use crate::state::AppState;

/// Read the signed-in user's ID from the session.
///
/// Unreadable values are treated as signed out.
pub async fn current_user(session: &Session) -> Option<UserId> {
    match session.get::<UserId>(session_keys::CURRENT_USER_ID).await {
        Ok(user_id) => user_id,
        Err(e) => {
            tracing::warn!("Failed to read current user from session: {e}");
            None
        }
    }
}

/// Helper to record the signed-in user in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user_id: &UserId,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER_ID, user_id).await
}

/// Helper to clear the signed-in user from the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<UserId>(session_keys::CURRENT_USER_ID)
        .await?;
    Ok(())
}

/// End the session: forget the user, drop its cart store, and delete the session.
///
/// Persisted collections are left in durable storage.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn sign_out(
    session: &Session,
    state: &AppState,
) -> Result<(), tower_sessions::session::Error> {
    clear_current_user(session).await?;
    if let Some(id) = session.id() {
        state.stores().end(&id).await;
    }
    session.flush().await
}
