//! Result store configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Result store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store provider type: `"redis"` or `"memory"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Result store address (required).
    #[serde(default)]
    pub url: String,
    /// Key prefix for all DocHarvest store keys.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    /// Time-to-live of snapshots and task results after their last write.
    #[serde(default = "default_result_ttl")]
    pub result_ttl_seconds: u64,
    /// In-memory store configuration.
    #[serde(default)]
    pub memory: MemoryStoreConfig,
}

impl StoreConfig {
    /// Result TTL as a [`Duration`].
    pub fn result_ttl(&self) -> Duration {
        Duration::from_secs(self.result_ttl_seconds)
    }
}

/// In-memory store backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryStoreConfig {
    /// Maximum number of entries in the store.
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
}

impl Default for MemoryStoreConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_max_capacity(),
        }
    }
}

fn default_provider() -> String {
    "redis".to_string()
}

fn default_key_prefix() -> String {
    "docharvest:".to_string()
}

fn default_result_ttl() -> u64 {
    3600
}

fn default_max_capacity() -> u64 {
    10000
}
