//! Typed access to the result store.
//!
//! Workers write; the tracker and the prober read. Every write refreshes the
//! entry's TTL, so an entry expires a fixed time after its last update.

use std::sync::Arc;
use std::time::Duration;

use tracing::trace;

use docharvest_core::config::store::StoreConfig;
use docharvest_core::error::{AppError, ErrorKind};
use docharvest_core::result::AppResult;
use docharvest_core::traits::cache::CacheProvider;
use docharvest_core::types::TaskHandle;
use docharvest_entity::{StatusSnapshot, TaskOutcome};

use crate::keys;
use crate::provider::CacheManager;

/// Result store keyed by task handle.
#[derive(Debug, Clone)]
pub struct ResultStore {
    cache: Arc<dyn CacheProvider>,
    ttl: Duration,
}

impl ResultStore {
    /// Wrap an existing provider.
    pub fn new(cache: Arc<dyn CacheProvider>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// Connect to the configured provider.
    pub async fn connect(config: &StoreConfig) -> AppResult<Self> {
        let manager = CacheManager::new(config).await?;
        Ok(Self::new(Arc::new(manager), config.result_ttl()))
    }

    /// TTL applied to every write.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Read the latest snapshot of a task. `None` when not yet written or expired.
    pub async fn read_snapshot(&self, handle: TaskHandle) -> AppResult<Option<StatusSnapshot>> {
        self.read(&keys::task_status(handle)).await
    }

    /// Overwrite the snapshot of a task.
    pub async fn write_snapshot(&self, handle: TaskHandle, snapshot: &StatusSnapshot) -> AppResult<()> {
        trace!(%handle, status = %snapshot, "Writing snapshot");
        self.write(&keys::task_status(handle), snapshot).await
    }

    /// Read the raw outcome of a task.
    pub async fn read_outcome(&self, handle: TaskHandle) -> AppResult<Option<TaskOutcome>> {
        self.read(&keys::task_result(handle)).await
    }

    /// Record the raw outcome of a task.
    pub async fn write_outcome(&self, handle: TaskHandle, outcome: &TaskOutcome) -> AppResult<()> {
        self.write(&keys::task_result(handle), outcome).await
    }

    /// Remove everything stored for a task.
    pub async fn clear(&self, handle: TaskHandle) -> AppResult<()> {
        self.cache.delete(&keys::task_status(handle)).await?;
        self.cache.delete(&keys::task_result(handle)).await
    }

    async fn read<T: serde::de::DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        let raw = self
            .cache
            .get(key)
            .await
            .map_err(|e| e.into_kind(ErrorKind::StoreRead))?;

        match raw {
            Some(raw) => serde_json::from_str(&raw).map(Some).map_err(|e| {
                AppError::with_source(
                    ErrorKind::StoreRead,
                    format!("Malformed entry under '{key}': {e}"),
                    e,
                )
            }),
            None => Ok(None),
        }
    }

    async fn write<T: serde::Serialize>(&self, key: &str, value: &T) -> AppResult<()> {
        let json = serde_json::to_string(value)?;
        self.cache
            .set(key, &json, self.ttl)
            .await
            .map_err(|e| e.into_kind(ErrorKind::StoreWrite))
    }
}
