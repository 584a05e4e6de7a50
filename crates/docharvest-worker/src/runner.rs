//! Worker runner: main loop that dequeues tasks and executes them.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::{OwnedSemaphorePermit, Semaphore, watch};
use tracing;

use docharvest_core::config::worker::WorkerConfig;
use docharvest_core::traits::queue::TaskQueue;
use docharvest_core::types::TaskEnvelope;
use docharvest_entity::{StatusSnapshot, TaskOutcome};
use docharvest_store::ResultStore;

use crate::executor::{JobExecutionError, JobExecutor};
use crate::progress::ProgressReporter;

/// Main worker runner that pulls tasks from the queue and executes them
#[derive(Debug)]
pub struct WorkerRunner {
    /// Task queue to consume
    queue: Arc<dyn TaskQueue>,
    /// Result store for snapshots and outcomes
    store: ResultStore,
    /// Job executor for dispatching
    executor: Arc<JobExecutor>,
    /// Worker configuration
    config: WorkerConfig,
    /// Worker identifier
    worker_id: String,
}

impl WorkerRunner {
    /// Create a new worker runner
    pub fn new(
        queue: Arc<dyn TaskQueue>,
        store: ResultStore,
        executor: Arc<JobExecutor>,
        config: WorkerConfig,
        worker_id: String,
    ) -> Self {
        Self {
            queue,
            store,
            executor,
            config,
            worker_id,
        }
    }

    /// Start the worker runner. Runs until the cancel signal is received
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        tracing::info!(
            "Worker '{}' started with concurrency={}, dequeue_wait={}s, handlers={:?}",
            self.worker_id,
            self.config.concurrency,
            self.config.dequeue_wait_seconds,
            self.executor.registered_types()
        );

        let concurrency = self.config.concurrency.max(1);
        let semaphore = Arc::new(Semaphore::new(concurrency));

        loop {
            if *cancel.borrow() {
                break;
            }
            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        tracing::info!("Worker '{}' received shutdown signal", self.worker_id);
                        break;
                    }
                }
                _ = self.poll_and_execute(&semaphore) => {}
            }
        }

        tracing::info!(
            "Worker '{}' waiting for in-flight tasks to complete...",
            self.worker_id
        );

        let grace = Duration::from_secs(self.config.shutdown_grace_seconds);
        if tokio::time::timeout(grace, semaphore.acquire_many(concurrency as u32))
            .await
            .is_err()
        {
            tracing::warn!(
                "Worker '{}' gave up waiting for in-flight tasks after {}s",
                self.worker_id,
                grace.as_secs()
            );
        }

        tracing::info!("Worker '{}' shut down complete", self.worker_id);
    }

    /// Wait for a free slot, take one task, and spawn its execution
    async fn poll_and_execute(&self, semaphore: &Arc<Semaphore>) {
        let permit = match semaphore.clone().acquire_owned().await {
            Ok(p) => p,
            Err(_) => return,
        };

        let wait = Duration::from_secs(self.config.dequeue_wait_seconds);
        match self.queue.dequeue(wait).await {
            Ok(Some(task)) => {
                let store = self.store.clone();
                let executor = Arc::clone(&self.executor);
                tokio::spawn(execute_task(task, store, executor, permit));
            }
            Ok(None) => {
                drop(permit);
                tracing::trace!("No tasks available");
            }
            Err(e) => {
                drop(permit);
                tracing::error!("Failed to dequeue task: {}", e);
                tokio::time::sleep(wait).await;
            }
        }
    }
}

/// Run one task and record its outcome. A panicking handler is recorded as
/// an execution failure.
async fn execute_task(
    task: TaskEnvelope,
    store: ResultStore,
    executor: Arc<JobExecutor>,
    permit: OwnedSemaphorePermit,
) {
    let _permit = permit;
    let handle = task.id;
    let mut reporter = ProgressReporter::new(store.clone(), handle);

    let result = AssertUnwindSafe(executor.execute(&task, &mut reporter))
        .catch_unwind()
        .await
        .unwrap_or_else(|_| {
            Err(JobExecutionError::Permanent(format!(
                "handler for '{}' panicked",
                task.task
            )))
        });

    let outcome = match result {
        Ok(value) => {
            tracing::info!(%handle, task = %task.task, "Task completed successfully");
            TaskOutcome::Succeeded {
                value: value.unwrap_or(serde_json::Value::Null),
            }
        }
        Err(err) => {
            match &err {
                JobExecutionError::Transient(msg) => {
                    tracing::warn!(%handle, "Task failed (transient): {}", msg)
                }
                JobExecutionError::Permanent(msg) => {
                    tracing::error!(%handle, "Task failed permanently: {}", msg)
                }
                JobExecutionError::Internal(e) => {
                    tracing::error!(%handle, "Task internal error: {}", e)
                }
            }

            let reason = err.reason();
            if let Err(e) = store
                .write_snapshot(handle, &StatusSnapshot::Failed { error: reason.clone() })
                .await
            {
                tracing::error!(%handle, "Failed to record failed snapshot: {}", e);
            }
            TaskOutcome::Failed { reason }
        }
    };

    if let Err(e) = store.write_outcome(handle, &outcome).await {
        tracing::error!(%handle, "Failed to record task outcome: {}", e);
    }
}
