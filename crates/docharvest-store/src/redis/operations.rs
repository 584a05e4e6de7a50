//! Redis result store provider.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use docharvest_core::error::{AppError, ErrorKind};
use docharvest_core::result::AppResult;
use docharvest_core::traits::cache::CacheProvider;

use super::client::RedisClient;

/// Redis-backed result store provider. Every write carries its own expiry.
#[derive(Debug, Clone)]
pub struct RedisCacheProvider {
    /// Redis client.
    client: RedisClient,
}

impl RedisCacheProvider {
    /// Create a new Redis provider.
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    fn read_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::StoreRead, format!("Redis read error: {e}"), e)
    }

    fn write_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::StoreWrite, format!("Redis write error: {e}"), e)
    }
}

#[async_trait]
impl CacheProvider for RedisCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let result: Option<String> = conn.get(&full_key).await.map_err(Self::read_err)?;
        Ok(result)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let _: () = conn
            .set_ex(&full_key, value, ttl.as_secs().max(1))
            .await
            .map_err(Self::write_err)?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let _: () = conn.del(&full_key).await.map_err(Self::write_err)?;
        Ok(())
    }
}
