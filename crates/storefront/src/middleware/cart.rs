//! Cart store extractor.
//!
//! The session's [`CartStore`] is handed to handlers explicitly through
//! [`SessionCart`] rather than looked up globally.

use axum::{extract::FromRequestParts, http::request::Parts};
use tokio::sync::MutexGuard;
use tower_sessions::Session;
use tower_sessions::session::Id;

use crate::error::{AppError, set_sentry_user};
use crate::middleware::identity::current_user;
use crate::models::session_keys;
use crate::state::AppState;
use crate::store::CartStore;
use crate::store::registry::SharedStore;

/// Extractor for the current session's cart/wishlist store.
///
/// Fails with an internal error if the request is not running under the
/// session layer; there is no store outside a session.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(cart: SessionCart) -> impl IntoResponse {
///     let store = cart.lock().await;
///     format!("{} items", store.item_count())
/// }
/// ```
pub struct SessionCart {
    store: SharedStore,
}

impl SessionCart {
    /// Wait for exclusive access to the store.
    pub async fn lock(&self) -> MutexGuard<'_, CartStore> {
        self.store.lock().await
    }
}

impl FromRequestParts<AppState> for SessionCart {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = parts.extensions.get::<Session>().cloned().ok_or_else(|| {
            AppError::Internal("cart store requested outside of a session scope".to_string())
        })?;

        let session_id = ensure_session_id(&session).await?;
        let identity = current_user(&session).await;
        if let Some(user_id) = &identity {
            set_sentry_user(user_id);
        }
        let store = state.stores().acquire(session_id, identity).await;

        Ok(Self { store })
    }
}

/// Get the session's ID, persisting a new session first if needed.
///
/// Fresh sessions have no ID until they are saved.
async fn ensure_session_id(session: &Session) -> Result<Id, AppError> {
    if let Some(id) = session.id() {
        return Ok(id);
    }

    session
        .insert(session_keys::STORE_OPENED_AT, chrono::Utc::now())
        .await?;
    session.save().await?;

    session
        .id()
        .ok_or_else(|| AppError::Internal("session has no ID after save".to_string()))
}
