//! Redis-backed permission cache store.
//!
//! Role permission lists are written by the user service; this adapter only
//! reads them.

use async_trait::async_trait;
use catalog_application::PermissionCacheStore;
use catalog_core::{AppError, AppResult};
use redis::AsyncCommands;

/// Redis implementation of the permission cache store port.
#[derive(Clone)]
pub struct RedisPermissionCacheStore {
    client: redis::Client,
}

impl RedisPermissionCacheStore {
    /// Creates a store with a configured Redis client.
    #[must_use]
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PermissionCacheStore for RedisPermissionCacheStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut connection = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|error| AppError::Unavailable(format!("failed to connect to redis: {error}")))?;

        let encoded: Option<String> = connection.get(key).await.map_err(|error| {
            AppError::Unavailable(format!("failed to read permission cache key '{key}': {error}"))
        })?;

        Ok(encoded)
    }
}
