//! Task queue trait shared by the dispatcher (producer) and the worker pool
//! (consumer).

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::id::TaskHandle;
use crate::types::task::TaskEnvelope;

/// Trait for task queue backends (Redis list or in-memory).
///
/// Delivery is at-least-once; the queue makes no exactly-once promise.
#[async_trait]
pub trait TaskQueue: Send + Sync + std::fmt::Debug + 'static {
    /// Enqueue a named task with a JSON payload.
    ///
    /// Returns the handle of the new task as soon as the backend has
    /// acknowledged the write. Fails with `QueueUnavailable` when the backend
    /// cannot be reached or the task cannot be encoded.
    async fn enqueue(&self, task: &str, payload: serde_json::Value) -> AppResult<TaskHandle>;

    /// Take the next task, waiting at most `wait` for one to arrive.
    async fn dequeue(&self, wait: Duration) -> AppResult<Option<TaskEnvelope>>;

    /// Number of tasks waiting to be picked up.
    async fn pending_count(&self) -> AppResult<u64>;
}
