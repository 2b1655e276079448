//! Session-scoped store lookup.
//!
//! Each browser session gets its own [`CartStore`], created on the session's
//! first cart or wishlist request and dropped when the session ends or sits
//! idle past the session expiry. Requests within one session are serialized
//! through the store's mutex, so every operation (including its storage
//! write) completes before the next one starts.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tokio::sync::Mutex;
use tower_sessions::session::Id;

use hearth_core::UserId;

use super::{CartStore, StoreOptions};
use crate::storage::UserStorage;

/// Maximum number of live session stores kept in memory.
const MAX_LIVE_SESSIONS: u64 = 50_000;

/// A store shared by the requests of one session.
pub type SharedStore = Arc<Mutex<CartStore>>;

/// Live stores keyed by session ID.
#[derive(Clone)]
pub struct StoreRegistry {
    stores: Cache<Id, SharedStore>,
    storage: Arc<dyn UserStorage>,
    options: StoreOptions,
}

impl StoreRegistry {
    /// Create a registry whose stores expire after `idle` without use.
    #[must_use]
    pub fn new(storage: Arc<dyn UserStorage>, options: StoreOptions, idle: Duration) -> Self {
        let stores = Cache::builder()
            .max_capacity(MAX_LIVE_SESSIONS)
            .time_to_idle(idle)
            .build();

        Self {
            stores,
            storage,
            options,
        }
    }

    /// Get the store for a session, opening one if the session has none.
    ///
    /// If the session's identity changed since the store was opened (sign-in
    /// or sign-out), the store is re-opened for the new identity.
    pub async fn acquire(&self, session_id: Id, identity: Option<UserId>) -> SharedStore {
        let store = self
            .stores
            .get_with(session_id, self.open(identity.clone()))
            .await;

        {
            let mut guard = store.lock().await;
            if guard.user_id() != identity.as_ref() {
                tracing::debug!(%session_id, "Session identity changed, reopening cart store");
                *guard = CartStore::open(identity, self.storage.clone(), self.options.clone()).await;
            }
        }

        store
    }

    /// Drop a session's store.
    pub async fn end(&self, session_id: &Id) {
        self.stores.invalidate(session_id).await;
    }

    async fn open(&self, identity: Option<UserId>) -> SharedStore {
        let store = CartStore::open(identity, self.storage.clone(), self.options.clone()).await;
        Arc::new(Mutex::new(store))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use hearth_core::{CartItem, ProductId, ProductRecord, ProductSnapshot};
    use rust_decimal::Decimal;

    use super::*;
    use crate::storage::{MemoryStorage, StorageKey, load_collection};

    fn registry() -> StoreRegistry {
        StoreRegistry::new(
            Arc::new(MemoryStorage::new()),
            StoreOptions::default(),
            Duration::from_secs(60),
        )
    }

    fn snapshot() -> ProductSnapshot {
        ProductSnapshot::new(
            ProductRecord {
                id: ProductId::new("chair"),
                name: "Chair".to_string(),
                images: Vec::new(),
                image_path: String::new(),
                price: Decimal::new(10, 0),
                description: String::new(),
                discount_percentage: Decimal::ZERO,
                is_featured_product: false,
                stock_level: 5,
                category: String::new(),
            },
            "",
            "",
            1,
        )
    }

    #[tokio::test]
    async fn test_same_session_shares_store() {
        let registry = registry();
        let session = Id::default();
        let user = Some(UserId::new("u1"));

        let first = registry.acquire(session, user.clone()).await;
        first.lock().await.add_to_cart(&snapshot()).await;

        let second = registry.acquire(session, user).await;
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.lock().await.cart().len(), 1);
    }

    #[tokio::test]
    async fn test_identity_change_reopens_store() {
        let registry = registry();
        let session = Id::default();

        let anonymous = registry.acquire(session, None).await;
        assert!(anonymous.lock().await.user_id().is_none());

        let signed_in = registry.acquire(session, Some(UserId::new("u1"))).await;
        assert_eq!(signed_in.lock().await.user_id().unwrap().as_str(), "u1");
    }

    #[tokio::test]
    async fn test_identity_loss_reopens_anonymous_store() {
        let storage = Arc::new(MemoryStorage::new());
        let registry = StoreRegistry::new(
            storage.clone(),
            StoreOptions::default(),
            Duration::from_secs(60),
        );
        let session = Id::default();

        let signed_in = registry.acquire(session, Some(UserId::new("u1"))).await;
        signed_in.lock().await.add_to_cart(&snapshot()).await;
        let item_id = signed_in.lock().await.cart()[0].id.clone();

        let anonymous = registry.acquire(session, None).await;
        let mut store = anonymous.lock().await;
        assert!(!Arc::ptr_eq(&signed_in, &anonymous));
        assert!(store.user_id().is_none());
        assert!(store.cart().is_empty());

        let outcome = store.handle_cart_increment(&item_id).await;
        assert!(outcome.notification().is_none());
        assert!(store.cart().is_empty());

        let persisted: Vec<CartItem> =
            load_collection(&*storage, &StorageKey::cart(&UserId::new("u1")))
                .await
                .unwrap()
                .unwrap();
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].quantity, 1);
    }

    #[tokio::test]
    async fn test_end_drops_session_store() {
        let registry = registry();
        let session = Id::default();
        let user = Some(UserId::new("u1"));

        let before = registry.acquire(session, user.clone()).await;
        registry.end(&session).await;
        let after = registry.acquire(session, user).await;

        assert!(!Arc::ptr_eq(&before, &after));
        // The persisted cart survives the session
        assert_eq!(after.lock().await.cart().len(), before.lock().await.cart().len());
    }
}
