//! Redis-backed key-value adapter.

use async_trait::async_trait;
use redis::AsyncCommands;
use staffhub_application::KeyValueStore;
use staffhub_core::{AppError, AppResult};

/// Redis implementation of the key-value store port.
///
/// Used for the permission snapshot cache when the deployment runs more
/// than one API process; entries share the server across processes.
#[derive(Clone)]
pub struct RedisKeyValueStore {
    client: redis::Client,
    key_prefix: String,
}

impl RedisKeyValueStore {
    /// Creates a store adapter with a configured Redis client and key prefix.
    #[must_use]
    pub fn new(client: redis::Client, key_prefix: impl Into<String>) -> Self {
        Self {
            client,
            key_prefix: key_prefix.into(),
        }
    }

    fn key_for(&self, key: &str) -> String {
        format!("{}:{key}", self.key_prefix)
    }

    async fn connection(&self) -> AppResult<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|error| AppError::Internal(format!("failed to connect to redis: {error}")))
    }
}

#[async_trait]
impl KeyValueStore for RedisKeyValueStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut connection = self.connection().await?;

        connection
            .get(self.key_for(key))
            .await
            .map_err(|error| AppError::Internal(format!("failed to read cache entry: {error}")))
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let mut connection = self.connection().await?;

        connection
            .set::<_, _, ()>(self.key_for(key), value)
            .await
            .map_err(|error| AppError::Internal(format!("failed to write cache entry: {error}")))
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let mut connection = self.connection().await?;

        connection
            .del::<_, ()>(self.key_for(key))
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete cache entry: {error}")))
    }
}
