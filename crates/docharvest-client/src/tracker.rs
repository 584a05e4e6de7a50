//! Progress tracking state machine.
//!
//! A tracker holds at most one task handle. Each [`ProgressTracker::poll_once`]
//! reads the handle's snapshot from the result store and turns it into a
//! [`ProgressView`] for rendering:
//!
//! ```text
//! Idle --begin--> Submitted --first snapshot--> Polling --terminal--> Complete | Failed
//! ```
//!
//! Reaching `Complete` or `Failed` disposes the handle. Polling a handle that
//! is not held afterwards is a caller error (`NotFound`).

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, warn};

use docharvest_core::error::AppError;
use docharvest_core::result::AppResult;
use docharvest_core::types::TaskHandle;
use docharvest_entity::{ProgressCounts, StatusSnapshot};
use docharvest_store::ResultStore;

/// Reason rendered when no snapshot shows up within the grace period.
pub const MISSING_SNAPSHOT_REASON: &str = "job not found / expired";

/// Lifecycle state of a tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackerState {
    /// No handle held.
    Idle,
    /// A handle is held; no snapshot read yet.
    Submitted,
    /// At least one non-terminal snapshot was read.
    Polling,
    /// The last tracked job completed.
    Complete,
    /// The last tracked job failed, expired, or could not be read.
    Failed,
}

/// What to render after one poll.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ProgressView {
    /// No snapshot yet; still inside the grace period.
    Waiting {
        /// Time since the handle was taken.
        elapsed_seconds: u64,
    },
    /// Job accepted or running. Counters and fraction never decrease.
    Running {
        /// Highest counters observed so far.
        counts: ProgressCounts,
        /// Highest fraction observed so far.
        fraction: f64,
    },
    /// Job finished; final tallies.
    Complete {
        /// Documents discovered.
        total: u64,
        /// Documents stored.
        succeeded: u64,
        /// Documents that failed.
        failed: u64,
    },
    /// Job failed, expired, or its status could not be read.
    Failed {
        /// Message shown to the operator.
        reason: String,
    },
}

impl ProgressView {
    /// Whether this view ends the observation.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete { .. } | Self::Failed { .. })
    }
}

impl fmt::Display for ProgressView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Waiting { elapsed_seconds } => {
                write!(f, "Waiting for the job to start ({elapsed_seconds}s)")
            }
            Self::Running { counts, fraction } => write!(
                f,
                "Processed {}/{} ({:.0}%), {} succeeded, {} failed",
                counts.processed,
                counts.total,
                fraction * 100.0,
                counts.succeeded,
                counts.failed
            ),
            Self::Complete {
                total,
                succeeded,
                failed,
            } => write!(
                f,
                "Complete: {total} documents, {succeeded} succeeded, {failed} failed"
            ),
            Self::Failed { reason } => write!(f, "Failed: {reason}"),
        }
    }
}

#[derive(Debug)]
struct HeldJob {
    handle: TaskHandle,
    taken_at: Instant,
    high_water: ProgressCounts,
    fraction: f64,
}

/// Polls the result store for one job at a time.
#[derive(Debug)]
pub struct ProgressTracker {
    store: ResultStore,
    grace: Duration,
    state: TrackerState,
    held: Option<HeldJob>,
}

impl ProgressTracker {
    /// Create an idle tracker.
    ///
    /// `grace` bounds how long a missing snapshot is rendered as "waiting"
    /// before the job is declared lost.
    pub fn new(store: ResultStore, grace: Duration) -> Self {
        Self {
            store,
            grace,
            state: TrackerState::Idle,
            held: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TrackerState {
        self.state
    }

    /// Handle currently held, if any.
    pub fn handle(&self) -> Option<TaskHandle> {
        self.held.as_ref().map(|job| job.handle)
    }

    /// Start tracking a freshly dispatched handle.
    ///
    /// Fails with `Conflict` while another handle is held.
    pub fn begin(&mut self, handle: TaskHandle) -> AppResult<()> {
        if let Some(job) = &self.held {
            return Err(AppError::conflict(format!(
                "Job {} is still in flight",
                job.handle
            )));
        }

        self.held = Some(HeldJob {
            handle,
            taken_at: Instant::now(),
            high_water: ProgressCounts::default(),
            fraction: 0.0,
        });
        self.state = TrackerState::Submitted;
        debug!(%handle, "Tracking job");
        Ok(())
    }

    /// Stop observing the held job without waiting for it. The job itself
    /// keeps running in the worker pool.
    pub fn abandon(&mut self) -> Option<TaskHandle> {
        let handle = self.held.take().map(|job| job.handle);
        if handle.is_some() {
            self.state = TrackerState::Idle;
        }
        handle
    }

    /// Read the held job's snapshot once and produce the view to render.
    ///
    /// Store failures do not surface as `Err`: they become a `Failed` view
    /// and dispose the handle. `Err(NotFound)` means `handle` is not held.
    pub async fn poll_once(&mut self, handle: TaskHandle) -> AppResult<ProgressView> {
        let taken_at = match &self.held {
            Some(job) if job.handle == handle => job.taken_at,
            _ => {
                return Err(AppError::not_found(format!(
                    "Job {handle} is not tracked"
                )));
            }
        };

        let snapshot = match self.store.read_snapshot(handle).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(%handle, "Failed to read job status: {}", e);
                return Ok(self.dispose(
                    TrackerState::Failed,
                    ProgressView::Failed {
                        reason: format!("Failed to read job status: {}", e.message),
                    },
                ));
            }
        };

        let view = match snapshot {
            None => {
                let elapsed = taken_at.elapsed();
                if elapsed > self.grace {
                    warn!(%handle, elapsed_secs = elapsed.as_secs(), "No status found for job");
                    self.dispose(
                        TrackerState::Failed,
                        ProgressView::Failed {
                            reason: MISSING_SNAPSHOT_REASON.to_string(),
                        },
                    )
                } else {
                    ProgressView::Waiting {
                        elapsed_seconds: elapsed.as_secs(),
                    }
                }
            }
            Some(StatusSnapshot::Complete {
                total,
                succeeded,
                failed,
            }) => self.dispose(
                TrackerState::Complete,
                ProgressView::Complete {
                    total,
                    succeeded,
                    failed,
                },
            ),
            Some(StatusSnapshot::Failed { error }) => {
                self.dispose(TrackerState::Failed, ProgressView::Failed { reason: error })
            }
            Some(running) => {
                let observed = running.counts().unwrap_or_default();
                self.observe(observed)
            }
        };

        Ok(view)
    }

    /// Fold a non-terminal observation into the high-water marks.
    fn observe(&mut self, observed: ProgressCounts) -> ProgressView {
        self.state = TrackerState::Polling;
        match self.held.as_mut() {
            Some(job) => {
                if observed.processed < job.high_water.processed {
                    debug!(
                        handle = %job.handle,
                        observed = observed.processed,
                        seen = job.high_water.processed,
                        "Stale snapshot, keeping previous progress"
                    );
                }
                job.high_water = job.high_water.max(observed);
                job.fraction = job.fraction.max(job.high_water.fraction());
                ProgressView::Running {
                    counts: job.high_water,
                    fraction: job.fraction,
                }
            }
            None => ProgressView::Running {
                counts: observed,
                fraction: observed.fraction(),
            },
        }
    }

    fn dispose(&mut self, state: TrackerState, view: ProgressView) -> ProgressView {
        if let Some(job) = self.held.take() {
            debug!(handle = %job.handle, state = ?state, "Job reached terminal state");
        }
        self.state = state;
        view
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use docharvest_core::config::store::MemoryStoreConfig;
    use docharvest_core::error::ErrorKind;
    use docharvest_core::traits::cache::CacheProvider;
    use docharvest_store::memory::MemoryCacheProvider;

    use super::*;

    const GRACE: Duration = Duration::from_secs(30);

    fn store() -> ResultStore {
        let provider = MemoryCacheProvider::new(&MemoryStoreConfig::default());
        ResultStore::new(Arc::new(provider), Duration::from_secs(60))
    }

    fn running(processed: u64, total: u64) -> StatusSnapshot {
        StatusSnapshot::InProgress {
            processed,
            total,
            succeeded: processed,
            failed: 0,
        }
    }

    #[derive(Debug)]
    struct BrokenCache;

    #[async_trait]
    impl CacheProvider for BrokenCache {
        async fn get(&self, _key: &str) -> AppResult<Option<String>> {
            Err(AppError::internal("connection reset"))
        }

        async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> AppResult<()> {
            Ok(())
        }

        async fn delete(&self, _key: &str) -> AppResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_stale_snapshot_is_clamped() {
        let store = store();
        let handle = TaskHandle::new();
        let mut tracker = ProgressTracker::new(store.clone(), GRACE);
        tracker.begin(handle).unwrap();

        store.write_snapshot(handle, &running(5, 10)).await.unwrap();
        let first = tracker.poll_once(handle).await.unwrap();

        store.write_snapshot(handle, &running(3, 10)).await.unwrap();
        let second = tracker.poll_once(handle).await.unwrap();

        assert_eq!(first, second);
        match second {
            ProgressView::Running { counts, fraction } => {
                assert_eq!(counts.processed, 5);
                assert_eq!(fraction, 0.5);
            }
            other => panic!("unexpected view: {other:?}"),
        }
        assert_eq!(tracker.state(), TrackerState::Polling);
    }

    #[tokio::test]
    async fn test_fraction_never_decreases_when_total_grows() {
        let store = store();
        let handle = TaskHandle::new();
        let mut tracker = ProgressTracker::new(store.clone(), GRACE);
        tracker.begin(handle).unwrap();

        let mut last = 0.0;
        for (processed, total) in [(0, 0), (4, 5), (5, 20), (2, 20), (19, 20)] {
            store
                .write_snapshot(handle, &running(processed, total))
                .await
                .unwrap();
            match tracker.poll_once(handle).await.unwrap() {
                ProgressView::Running { fraction, .. } => {
                    assert!(fraction >= last, "{fraction} < {last}");
                    last = fraction;
                }
                other => panic!("unexpected view: {other:?}"),
            }
        }
        assert_eq!(last, 0.95);
    }

    #[tokio::test]
    async fn test_pending_renders_as_running_with_zero_counts() {
        let store = store();
        let handle = TaskHandle::new();
        let mut tracker = ProgressTracker::new(store.clone(), GRACE);
        tracker.begin(handle).unwrap();
        assert_eq!(tracker.state(), TrackerState::Submitted);

        store
            .write_snapshot(handle, &StatusSnapshot::Pending)
            .await
            .unwrap();
        let view = tracker.poll_once(handle).await.unwrap();

        assert_eq!(
            view,
            ProgressView::Running {
                counts: ProgressCounts::default(),
                fraction: 0.0
            }
        );
        assert_eq!(tracker.state(), TrackerState::Polling);
    }

    #[tokio::test]
    async fn test_complete_disposes_handle() {
        let store = store();
        let handle = TaskHandle::new();
        let mut tracker = ProgressTracker::new(store.clone(), GRACE);
        tracker.begin(handle).unwrap();

        store
            .write_snapshot(
                handle,
                &StatusSnapshot::Complete {
                    total: 4,
                    succeeded: 3,
                    failed: 1,
                },
            )
            .await
            .unwrap();

        let view = tracker.poll_once(handle).await.unwrap();
        assert!(view.is_terminal());
        assert_eq!(tracker.state(), TrackerState::Complete);
        assert_eq!(tracker.handle(), None);

        let err = tracker.poll_once(handle).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_worker_failure_is_rendered_verbatim() {
        let store = store();
        let handle = TaskHandle::new();
        let mut tracker = ProgressTracker::new(store.clone(), GRACE);
        tracker.begin(handle).unwrap();

        store
            .write_snapshot(
                handle,
                &StatusSnapshot::Failed {
                    error: "document API returned 503".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(
            tracker.poll_once(handle).await.unwrap(),
            ProgressView::Failed {
                reason: "document API returned 503".to_string()
            }
        );
        assert_eq!(tracker.state(), TrackerState::Failed);
        assert_eq!(tracker.handle(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_snapshot_waits_then_fails_after_grace() {
        let handle = TaskHandle::new();
        let mut tracker = ProgressTracker::new(store(), GRACE);
        tracker.begin(handle).unwrap();

        let view = tracker.poll_once(handle).await.unwrap();
        assert_eq!(view, ProgressView::Waiting { elapsed_seconds: 0 });
        assert_eq!(tracker.state(), TrackerState::Submitted);

        tokio::time::advance(GRACE + Duration::from_secs(1)).await;
        let view = tracker.poll_once(handle).await.unwrap();
        assert_eq!(
            view,
            ProgressView::Failed {
                reason: MISSING_SNAPSHOT_REASON.to_string()
            }
        );
        assert_eq!(tracker.handle(), None);
    }

    #[tokio::test]
    async fn test_store_error_fails_and_disposes() {
        let store = ResultStore::new(Arc::new(BrokenCache), Duration::from_secs(60));
        let handle = TaskHandle::new();
        let mut tracker = ProgressTracker::new(store, GRACE);
        tracker.begin(handle).unwrap();

        match tracker.poll_once(handle).await.unwrap() {
            ProgressView::Failed { reason } => assert!(reason.contains("connection reset")),
            other => panic!("unexpected view: {other:?}"),
        }
        assert_eq!(tracker.state(), TrackerState::Failed);
        assert!(tracker.poll_once(handle).await.is_err());
    }

    #[tokio::test]
    async fn test_single_flight() {
        let mut tracker = ProgressTracker::new(store(), GRACE);
        tracker.begin(TaskHandle::new()).unwrap();

        let err = tracker.begin(TaskHandle::new()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);

        tracker.abandon();
        assert_eq!(tracker.state(), TrackerState::Idle);
        tracker.begin(TaskHandle::new()).unwrap();
    }

    #[tokio::test]
    async fn test_polling_foreign_handle_is_not_found() {
        let mut tracker = ProgressTracker::new(store(), GRACE);
        tracker.begin(TaskHandle::new()).unwrap();

        let err = tracker.poll_once(TaskHandle::new()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(tracker.handle().is_some());
    }
}
