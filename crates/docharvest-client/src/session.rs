//! Operator session: one dispatcher, one tracker, one prober.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::info;

use docharvest_core::config::AppConfig;
use docharvest_core::config::tracker::{ProbeConfig, TrackerConfig};
use docharvest_core::error::AppError;
use docharvest_core::result::AppResult;
use docharvest_core::traits::queue::TaskQueue;
use docharvest_core::types::TaskHandle;
use docharvest_entity::{HealthProbeResult, JobRequest};
use docharvest_store::{ResultStore, connect_queue};

use crate::dispatcher::Dispatcher;
use crate::probe::HealthProber;
use crate::ticker;
use crate::tracker::{ProgressTracker, ProgressView, TrackerState};

/// State of one operator session.
///
/// At most one job is in flight per session: [`Session::submit`] is rejected
/// with `Conflict` until the current job reaches a terminal state or is
/// abandoned.
#[derive(Debug)]
pub struct Session {
    dispatcher: Dispatcher,
    tracker: ProgressTracker,
    prober: HealthProber,
    poll_interval: Duration,
    probe_timeout: Duration,
}

impl Session {
    /// Build a session over already connected backends.
    pub fn new(
        queue: Arc<dyn TaskQueue>,
        store: ResultStore,
        tracker: &TrackerConfig,
        probe: &ProbeConfig,
    ) -> Self {
        Self {
            dispatcher: Dispatcher::new(Arc::clone(&queue)),
            tracker: ProgressTracker::new(store.clone(), tracker.missing_grace()),
            prober: HealthProber::new(queue, store, probe.check_interval()),
            poll_interval: tracker.poll_interval(),
            probe_timeout: probe.timeout(),
        }
    }

    /// Connect the configured queue and store, then build a session.
    pub async fn connect(config: &AppConfig) -> AppResult<Self> {
        let queue = connect_queue(&config.queue).await?;
        let store = ResultStore::connect(&config.store).await?;
        info!(
            queue = %config.queue.provider,
            store = %config.store.provider,
            "Session connected"
        );
        Ok(Self::new(queue, store, &config.tracker, &config.probe))
    }

    /// Tracker lifecycle state.
    pub fn state(&self) -> TrackerState {
        self.tracker.state()
    }

    /// Handle of the job in flight, if any.
    pub fn current(&self) -> Option<TaskHandle> {
        self.tracker.handle()
    }

    /// Dispatch a job and start tracking it.
    pub async fn submit(&mut self, request: &JobRequest) -> AppResult<TaskHandle> {
        if let Some(handle) = self.tracker.handle() {
            return Err(AppError::conflict(format!(
                "Job {handle} is still in flight; wait for it or abandon it first"
            )));
        }

        let handle = self.dispatcher.submit(request).await?;
        self.tracker.begin(handle)?;
        Ok(handle)
    }

    /// Start tracking a job dispatched elsewhere, e.g. by an earlier process.
    pub fn attach(&mut self, handle: TaskHandle) -> AppResult<()> {
        self.tracker.begin(handle)
    }

    /// Stop observing the current job.
    pub fn abandon(&mut self) -> Option<TaskHandle> {
        self.tracker.abandon()
    }

    /// Poll the current job once.
    pub async fn poll_once(&mut self, handle: TaskHandle) -> AppResult<ProgressView> {
        self.tracker.poll_once(handle).await
    }

    /// Poll on the configured interval until the job is terminal.
    pub async fn watch<F>(&mut self, handle: TaskHandle, render: F) -> AppResult<ProgressView>
    where
        F: FnMut(&ProgressView),
    {
        ticker::watch_job(&mut self.tracker, handle, self.poll_interval, render).await
    }

    /// Like [`Session::watch`], stopping early when `cancel` turns `true`.
    pub async fn watch_until<F>(
        &mut self,
        handle: TaskHandle,
        cancel: watch::Receiver<bool>,
        render: F,
    ) -> AppResult<Option<ProgressView>>
    where
        F: FnMut(&ProgressView),
    {
        ticker::watch_job_until(&mut self.tracker, handle, self.poll_interval, cancel, render)
            .await
    }

    /// Probe the queue with the configured timeout.
    pub async fn probe_health(&self) -> HealthProbeResult {
        self.prober.probe(self.probe_timeout).await
    }

    /// Probe the queue with an explicit timeout.
    pub async fn probe_health_within(&self, timeout: Duration) -> HealthProbeResult {
        self.prober.probe(timeout).await
    }
}
