//! Cache manager that dispatches to the configured result store provider.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use docharvest_core::config::store::StoreConfig;
use docharvest_core::error::AppError;
use docharvest_core::result::AppResult;
use docharvest_core::traits::cache::CacheProvider;

/// Cache manager that wraps the configured provider.
#[derive(Debug, Clone)]
pub struct CacheManager {
    /// The inner cache provider.
    inner: Arc<dyn CacheProvider>,
}

impl CacheManager {
    /// Create a new cache manager from configuration.
    pub async fn new(config: &StoreConfig) -> AppResult<Self> {
        let inner: Arc<dyn CacheProvider> = match config.provider.as_str() {
            #[cfg(feature = "redis-backend")]
            "redis" => {
                info!("Initializing Redis result store");
                let client =
                    crate::redis::RedisClient::connect(&config.url, &config.key_prefix).await?;
                Arc::new(crate::redis::RedisCacheProvider::new(client))
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory result store");
                Arc::new(crate::memory::MemoryCacheProvider::new(&config.memory))
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown store provider: '{other}'. Supported: memory, redis"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Create a cache manager from an existing provider (for testing).
    pub fn from_provider(provider: Arc<dyn CacheProvider>) -> Self {
        Self { inner: provider }
    }
}

#[async_trait]
impl CacheProvider for CacheManager {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        self.inner.set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.inner.delete(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docharvest_core::error::ErrorKind;

    fn config(provider: &str) -> StoreConfig {
        StoreConfig {
            provider: provider.to_string(),
            url: "memory://".to_string(),
            key_prefix: "test:".to_string(),
            result_ttl_seconds: 60,
            memory: Default::default(),
        }
    }

    #[tokio::test]
    async fn test_unknown_provider_is_rejected() {
        let err = CacheManager::new(&config("etcd")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn test_memory_provider_round_trip() {
        let manager = CacheManager::new(&config("memory")).await.unwrap();
        manager.set("k", "v", Duration::from_secs(60)).await.unwrap();
        assert_eq!(manager.get("k").await.unwrap(), Some("v".to_string()));
        manager.delete("k").await.unwrap();
        assert_eq!(manager.get("k").await.unwrap(), None);
    }
}
