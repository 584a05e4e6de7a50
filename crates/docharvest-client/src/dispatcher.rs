//! Job submission.

use std::sync::Arc;

use tracing::info;

use docharvest_core::error::{AppError, ErrorKind};
use docharvest_core::result::AppResult;
use docharvest_core::traits::queue::TaskQueue;
use docharvest_core::types::TaskHandle;
use docharvest_entity::JobRequest;
use docharvest_entity::job::payload::PROCESS_DOCUMENTS_TASK;

/// Submits job requests to the task queue.
///
/// Submission returns as soon as the queue acknowledges the write. Nothing is
/// retried here: one operator action is at most one submission.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    queue: Arc<dyn TaskQueue>,
}

impl Dispatcher {
    /// Create a dispatcher over a queue backend.
    pub fn new(queue: Arc<dyn TaskQueue>) -> Self {
        Self { queue }
    }

    /// Enqueue a batch job and return its handle.
    ///
    /// Any failure, including payload encoding, is reported as
    /// `QueueUnavailable`; no handle exists in that case.
    pub async fn submit(&self, request: &JobRequest) -> AppResult<TaskHandle> {
        let payload = serde_json::to_value(request).map_err(|e| {
            AppError::with_source(
                ErrorKind::QueueUnavailable,
                format!("Failed to encode job request: {e}"),
                e,
            )
        })?;

        let handle = self
            .queue
            .enqueue(PROCESS_DOCUMENTS_TASK, payload)
            .await
            .map_err(|e| e.into_kind(ErrorKind::QueueUnavailable))?;

        info!(
            %handle,
            identifiers = request.identifiers().len(),
            destination = request.destination(),
            "Job submitted"
        );
        Ok(handle)
    }
}
