//! Durable per-user storage.
//!
//! The cart/wishlist store mirrors each shopper's collections into a string
//! key/value store so they survive across sessions. Two entries exist per
//! user:
//!
//! ```text
//! cart_<userId>      JSON array of CartItem
//! wishlist_<userId>  JSON array of WishListItem
//! ```
//!
//! Values are written as plain JSON with no version marker.
//!
//! # Backends
//!
//! - [`MemoryStorage`] - process-local map, used in tests and local development
//! - [`crate::db::PgUserStorage`] - `PostgreSQL` table `storefront.user_storage`

pub mod memory;

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use hearth_core::UserId;

pub use memory::MemoryStorage;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored value could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backend refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Key of a single durable storage entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    /// Key holding a user's cart.
    #[must_use]
    pub fn cart(user_id: &UserId) -> Self {
        Self(format!("cart_{user_id}"))
    }

    /// Key holding a user's wishlist.
    #[must_use]
    pub fn wish_list(user_id: &UserId) -> Self {
        Self(format!("wishlist_{user_id}"))
    }

    /// The raw key string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// String-valued key/value storage scoped by key.
#[async_trait]
pub trait UserStorage: Send + Sync {
    /// Read the value stored under `key`, if any.
    async fn get(&self, key: &StorageKey) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous value.
    async fn set(&self, key: &StorageKey, value: String) -> Result<(), StorageError>;

    /// Delete the value stored under `key`. Missing keys are not an error.
    async fn remove(&self, key: &StorageKey) -> Result<(), StorageError>;

    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

/// Load and decode a stored collection.
///
/// # Errors
///
/// Returns `StorageError` if the backend fails or the stored JSON does not
/// decode into `Vec<T>`.
pub async fn load_collection<T: DeserializeOwned>(
    storage: &dyn UserStorage,
    key: &StorageKey,
) -> Result<Option<Vec<T>>, StorageError> {
    match storage.get(key).await? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Encode and store a collection, preserving order.
///
/// # Errors
///
/// Returns `StorageError` if encoding or the backend write fails.
pub async fn save_collection<T: Serialize + Sync>(
    storage: &dyn UserStorage,
    key: &StorageKey,
    items: &[T],
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(items)?;
    storage.set(key, raw).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        let user = UserId::new("user_29wBMCtzATuFJut8jO2pYVNiZTT");
        assert_eq!(
            StorageKey::cart(&user).as_str(),
            "cart_user_29wBMCtzATuFJut8jO2pYVNiZTT"
        );
        assert_eq!(
            StorageKey::wish_list(&user).to_string(),
            "wishlist_user_29wBMCtzATuFJut8jO2pYVNiZTT"
        );
    }

    #[tokio::test]
    async fn test_collection_round_trip_preserves_order() {
        let storage = MemoryStorage::new();
        let key = StorageKey::cart(&UserId::new("u1"));

        save_collection(&storage, &key, &["b", "a", "c"]).await.unwrap();
        let loaded: Vec<String> = load_collection(&storage, &key).await.unwrap().unwrap();

        assert_eq!(loaded, vec!["b", "a", "c"]);
    }

    #[tokio::test]
    async fn test_load_missing_collection() {
        let storage = MemoryStorage::new();
        let key = StorageKey::wish_list(&UserId::new("nobody"));

        let loaded: Option<Vec<String>> = load_collection(&storage, &key).await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_load_corrupt_collection_is_error() {
        let storage = MemoryStorage::new();
        let key = StorageKey::cart(&UserId::new("u1"));
        storage.set(&key, "{not json".to_string()).await.unwrap();

        let result: Result<Option<Vec<String>>, _> = load_collection(&storage, &key).await;
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }
}
