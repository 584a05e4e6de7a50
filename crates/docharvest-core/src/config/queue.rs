//! Task queue backend configuration.

use serde::{Deserialize, Serialize};

/// Task queue configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Queue provider type: `"redis"` or `"memory"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Queue backend address (required).
    #[serde(default)]
    pub url: String,
    /// Name of the queue tasks are pushed to.
    #[serde(default = "default_name")]
    pub name: String,
    /// Key prefix for queue keys.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

fn default_provider() -> String {
    "redis".to_string()
}

fn default_name() -> String {
    "docharvest".to_string()
}

fn default_key_prefix() -> String {
    "docharvest:".to_string()
}
