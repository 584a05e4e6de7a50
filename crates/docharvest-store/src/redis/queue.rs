//! Redis list-backed task queue (`LPUSH` to enqueue, `RPOP` to dequeue).

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use tokio::time::Instant;
use tracing::debug;

use docharvest_core::error::{AppError, ErrorKind};
use docharvest_core::result::AppResult;
use docharvest_core::traits::queue::TaskQueue;
use docharvest_core::types::{TaskEnvelope, TaskHandle};

use super::client::RedisClient;
use crate::keys;
use crate::queue::deadline_after;

/// Interval between `RPOP` attempts while a dequeue is waiting.
const DEQUEUE_POLL_STEP: Duration = Duration::from_millis(200);

/// Redis-backed FIFO task queue.
#[derive(Debug, Clone)]
pub struct RedisTaskQueue {
    /// Redis client.
    client: RedisClient,
    /// Fully prefixed list key.
    list_key: String,
}

impl RedisTaskQueue {
    /// Connect to the queue backend.
    pub async fn connect(url: &str, key_prefix: &str, name: &str) -> AppResult<Self> {
        let client = RedisClient::connect_as(url, key_prefix, ErrorKind::QueueUnavailable).await?;
        let list_key = client.prefixed_key(&keys::queue(name));
        Ok(Self { client, list_key })
    }

    fn map_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::QueueUnavailable, format!("Redis queue error: {e}"), e)
    }
}

#[async_trait]
impl TaskQueue for RedisTaskQueue {
    async fn enqueue(&self, task: &str, payload: serde_json::Value) -> AppResult<TaskHandle> {
        let envelope = TaskEnvelope::new(task, payload);
        let encoded = serde_json::to_string(&envelope)
            .map_err(|e| AppError::from(e).into_kind(ErrorKind::QueueUnavailable))?;

        let mut conn = self.client.conn_mut();
        let _: i64 = conn
            .lpush(&self.list_key, encoded)
            .await
            .map_err(Self::map_err)?;

        debug!(handle = %envelope.id, task, queue = %self.list_key, "Enqueued task");
        Ok(envelope.id)
    }

    async fn dequeue(&self, wait: Duration) -> AppResult<Option<TaskEnvelope>> {
        let deadline = deadline_after(wait);
        let mut conn = self.client.conn_mut();

        loop {
            let raw: Option<String> = conn.rpop(&self.list_key, None).await.map_err(Self::map_err)?;

            if let Some(raw) = raw {
                let envelope: TaskEnvelope = serde_json::from_str(&raw)?;
                return Ok(Some(envelope));
            }

            let now = Instant::now();
            if now >= deadline {
                return Ok(None);
            }
            tokio::time::sleep(DEQUEUE_POLL_STEP.min(deadline - now)).await;
        }
    }

    async fn pending_count(&self) -> AppResult<u64> {
        let mut conn = self.client.conn_mut();
        let len: u64 = conn.llen(&self.list_key).await.map_err(Self::map_err)?;
        Ok(len)
    }
}
