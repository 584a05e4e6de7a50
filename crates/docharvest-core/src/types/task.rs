//! Wire format of a queued task.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::TaskHandle;

/// A task as it travels through the queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskEnvelope {
    /// Handle under which results are written.
    pub id: TaskHandle,
    /// Registered task name (e.g. `"ping"`, `"process_documents"`).
    pub task: String,
    /// Task-specific payload.
    pub payload: serde_json::Value,
    /// When the task was enqueued.
    pub enqueued_at: DateTime<Utc>,
}

impl TaskEnvelope {
    /// Build a new envelope with a fresh handle.
    pub fn new(task: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            id: TaskHandle::new(),
            task: task.into(),
            payload,
            enqueued_at: Utc::now(),
        }
    }
}
