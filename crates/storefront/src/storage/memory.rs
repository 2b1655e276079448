//! In-process storage backend.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{StorageError, StorageKey, UserStorage};

/// Storage backed by a map held in memory.
///
/// Contents are lost on restart. Used for tests and `STOREFRONT_STORAGE=memory`.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl UserStorage for MemoryStorage {
    async fn get(&self, key: &StorageKey) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().await.get(key.as_str()).cloned())
    }

    async fn set(&self, key: &StorageKey, value: String) -> Result<(), StorageError> {
        self.entries
            .write()
            .await
            .insert(key.as_str().to_owned(), value);
        Ok(())
    }

    async fn remove(&self, key: &StorageKey) -> Result<(), StorageError> {
        self.entries.write().await.remove(key.as_str());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use hearth_core::UserId;

    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let storage = MemoryStorage::new();
        let key = StorageKey::cart(&UserId::new("u1"));

        assert!(storage.is_empty().await);
        storage.set(&key, "[]".to_string()).await.unwrap();
        assert_eq!(storage.get(&key).await.unwrap().as_deref(), Some("[]"));
        assert_eq!(storage.len().await, 1);

        storage.remove(&key).await.unwrap();
        assert!(storage.get(&key).await.unwrap().is_none());

        // Removing again is fine
        storage.remove(&key).await.unwrap();
    }
}
