//! Snapshot publishing for handlers that report progress.

use tracing::debug;

use docharvest_core::result::AppResult;
use docharvest_core::types::TaskHandle;
use docharvest_entity::{ProgressCounts, StatusSnapshot};
use docharvest_store::ResultStore;

/// Publishes the status snapshots of one task.
///
/// Counters only move forward, so every snapshot written through the
/// reporter satisfies `processed <= total` and `succeeded + failed <= processed`.
#[derive(Debug)]
pub struct ProgressReporter {
    store: ResultStore,
    handle: TaskHandle,
    counts: ProgressCounts,
}

impl ProgressReporter {
    /// Create a reporter for the given task.
    pub fn new(store: ResultStore, handle: TaskHandle) -> Self {
        Self {
            store,
            handle,
            counts: ProgressCounts::default(),
        }
    }

    /// Handle the reporter writes under.
    pub fn handle(&self) -> TaskHandle {
        self.handle
    }

    /// Current counters.
    pub fn counts(&self) -> ProgressCounts {
        self.counts
    }

    /// Publish `Pending`: accepted, nothing discovered yet.
    pub async fn pending(&mut self) -> AppResult<()> {
        self.store
            .write_snapshot(self.handle, &StatusSnapshot::Pending)
            .await
    }

    /// Publish the number of documents discovered for the job.
    pub async fn begin(&mut self, total: u64) -> AppResult<()> {
        self.counts.total = self.counts.total.max(total);
        self.publish().await
    }

    /// Record one handled document and publish.
    pub async fn record(&mut self, succeeded: bool) -> AppResult<()> {
        self.counts.processed += 1;
        self.counts.total = self.counts.total.max(self.counts.processed);
        if succeeded {
            self.counts.succeeded += 1;
        } else {
            self.counts.failed += 1;
        }
        self.publish().await
    }

    /// Publish the terminal `Complete` snapshot.
    pub async fn complete(&mut self) -> AppResult<ProgressCounts> {
        let snapshot = StatusSnapshot::Complete {
            total: self.counts.total,
            succeeded: self.counts.succeeded,
            failed: self.counts.failed,
        };
        self.store.write_snapshot(self.handle, &snapshot).await?;
        Ok(self.counts)
    }

    /// Publish the terminal `Failed` snapshot.
    pub async fn fail(&mut self, error: &str) -> AppResult<()> {
        let snapshot = StatusSnapshot::Failed {
            error: error.to_string(),
        };
        self.store.write_snapshot(self.handle, &snapshot).await
    }

    async fn publish(&self) -> AppResult<()> {
        debug!(
            handle = %self.handle,
            processed = self.counts.processed,
            total = self.counts.total,
            "Publishing progress"
        );
        self.store
            .write_snapshot(self.handle, &StatusSnapshot::in_progress(self.counts))
            .await
    }
}
