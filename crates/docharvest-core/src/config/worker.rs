//! Worker pool configuration.

use serde::{Deserialize, Serialize};

/// Worker pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Number of concurrent task slots.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// How long a single dequeue call blocks waiting for a task.
    #[serde(default = "default_dequeue_wait")]
    pub dequeue_wait_seconds: u64,
    /// How long shutdown waits for in-flight tasks.
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace_seconds: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            dequeue_wait_seconds: default_dequeue_wait(),
            shutdown_grace_seconds: default_shutdown_grace(),
        }
    }
}

fn default_concurrency() -> usize {
    4
}

fn default_dequeue_wait() -> u64 {
    5
}

fn default_shutdown_grace() -> u64 {
    30
}
