//! `PostgreSQL` backend for durable per-user storage.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::storage::{StorageError, StorageKey, UserStorage};

/// User storage kept in `storefront.user_storage`.
#[derive(Debug, Clone)]
pub struct PgUserStorage {
    pool: PgPool,
}

impl PgUserStorage {
    /// Create a storage backend over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStorage for PgUserStorage {
    async fn get(&self, key: &StorageKey) -> Result<Option<String>, StorageError> {
        let value = sqlx::query_scalar::<_, String>(
            "SELECT value FROM storefront.user_storage WHERE key = $1",
        )
        .bind(key.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(value)
    }

    async fn set(&self, key: &StorageKey, value: String) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO storefront.user_storage (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key)
            DO UPDATE SET value = EXCLUDED.value, updated_at = now()
            ",
        )
        .bind(key.as_str())
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove(&self, key: &StorageKey) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM storefront.user_storage WHERE key = $1")
            .bind(key.as_str())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
