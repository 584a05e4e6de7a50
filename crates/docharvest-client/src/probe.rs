//! Queue health probe.
//!
//! Sends the `ping` task and waits, with a hard deadline, for a worker to
//! echo the sentinel. The wait never outlives the deadline: the enqueue and
//! every store read run inside it, and cleanup happens in the background.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::time;
use tracing;

use docharvest_core::traits::queue::TaskQueue;
use docharvest_core::types::TaskHandle;
use docharvest_entity::job::payload::{PING_RESPONSE, PING_TASK};
use docharvest_entity::{HealthProbeResult, TaskOutcome};
use docharvest_store::{ResultStore, deadline_after};

/// Round-trip reachability check against the task queue and worker pool.
#[derive(Debug, Clone)]
pub struct HealthProber {
    queue: Arc<dyn TaskQueue>,
    store: ResultStore,
    check_interval: Duration,
}

impl HealthProber {
    /// Create a prober. `check_interval` is the pause between result reads.
    pub fn new(queue: Arc<dyn TaskQueue>, store: ResultStore, check_interval: Duration) -> Self {
        Self {
            queue,
            store,
            check_interval,
        }
    }

    /// Probe the queue, returning no later than `timeout` from now.
    pub async fn probe(&self, timeout: Duration) -> HealthProbeResult {
        let deadline = deadline_after(timeout);

        let handle = match time::timeout_at(deadline, self.queue.enqueue(PING_TASK, Value::Null))
            .await
        {
            Ok(Ok(handle)) => handle,
            Ok(Err(e)) => {
                tracing::warn!("Health probe could not enqueue ping: {}", e);
                return HealthProbeResult::Unreachable(e.message);
            }
            Err(_) => return HealthProbeResult::TimedOut,
        };

        let result = match time::timeout_at(deadline, self.await_outcome(handle)).await {
            Ok(result) => result,
            Err(_) => HealthProbeResult::TimedOut,
        };

        tracing::info!(%handle, result = %result, "Health probe finished");
        self.cleanup(handle);
        result
    }

    async fn await_outcome(&self, handle: TaskHandle) -> HealthProbeResult {
        loop {
            match self.store.read_outcome(handle).await {
                Ok(Some(TaskOutcome::Succeeded { value })) => return classify(value),
                Ok(Some(TaskOutcome::Failed { reason })) => {
                    return HealthProbeResult::ExecutionFailed(reason);
                }
                Ok(None) => time::sleep(self.check_interval).await,
                Err(e) => return HealthProbeResult::Unreachable(e.message),
            }
        }
    }

    fn cleanup(&self, handle: TaskHandle) {
        let store = self.store.clone();
        tokio::spawn(async move {
            if let Err(e) = store.clear(handle).await {
                tracing::debug!(%handle, "Failed to clear probe result: {}", e);
            }
        });
    }
}

/// Compare a returned value with the sentinel.
fn classify(value: Value) -> HealthProbeResult {
    match value {
        Value::String(s) if s == PING_RESPONSE => HealthProbeResult::Ok,
        Value::String(s) => HealthProbeResult::UnexpectedResponse(s),
        other => HealthProbeResult::UnexpectedResponse(other.to_string()),
    }
}
