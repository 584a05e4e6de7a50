//! In-process FIFO task queue.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;
use tracing::debug;

use docharvest_core::error::AppError;
use docharvest_core::result::AppResult;
use docharvest_core::traits::queue::TaskQueue;
use docharvest_core::types::{TaskEnvelope, TaskHandle};

use crate::queue::deadline_after;

/// In-memory task queue shared between producers and consumers of one process.
///
/// Clones share the same underlying queue.
#[derive(Debug, Clone, Default)]
pub struct MemoryTaskQueue {
    tasks: Arc<Mutex<VecDeque<TaskEnvelope>>>,
    notify: Arc<Notify>,
}

impl MemoryTaskQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    fn pop(&self) -> AppResult<Option<TaskEnvelope>> {
        let mut tasks = self
            .tasks
            .lock()
            .map_err(|e| AppError::internal(format!("Queue lock poisoned: {e}")))?;
        Ok(tasks.pop_front())
    }
}

#[async_trait]
impl TaskQueue for MemoryTaskQueue {
    async fn enqueue(&self, task: &str, payload: serde_json::Value) -> AppResult<TaskHandle> {
        let envelope = TaskEnvelope::new(task, payload);
        let handle = envelope.id;
        {
            let mut tasks = self
                .tasks
                .lock()
                .map_err(|e| AppError::queue_unavailable(format!("Queue lock poisoned: {e}")))?;
            tasks.push_back(envelope);
        }
        self.notify.notify_one();

        debug!(%handle, task, "Enqueued task");
        Ok(handle)
    }

    async fn dequeue(&self, wait: Duration) -> AppResult<Option<TaskEnvelope>> {
        let deadline = deadline_after(wait);

        loop {
            if let Some(task) = self.pop()? {
                return Ok(Some(task));
            }
            if tokio::time::timeout_at(deadline, self.notify.notified())
                .await
                .is_err()
            {
                return self.pop();
            }
        }
    }

    async fn pending_count(&self) -> AppResult<u64> {
        let tasks = self
            .tasks
            .lock()
            .map_err(|e| AppError::internal(format!("Queue lock poisoned: {e}")))?;
        Ok(tasks.len() as u64)
    }
}
