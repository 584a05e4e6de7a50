//! Timer loop driving a tracker to a terminal view.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing;

use docharvest_core::error::AppError;
use docharvest_core::result::AppResult;
use docharvest_core::types::TaskHandle;

use crate::tracker::{ProgressTracker, ProgressView};

/// Poll `handle` every `period` and hand each view to `render`, until a
/// terminal view. The first poll happens immediately.
pub async fn watch_job<F>(
    tracker: &mut ProgressTracker,
    handle: TaskHandle,
    period: Duration,
    render: F,
) -> AppResult<ProgressView>
where
    F: FnMut(&ProgressView),
{
    let (_keep_open, cancel) = watch::channel(false);
    watch_job_until(tracker, handle, period, cancel, render)
        .await?
        .ok_or_else(|| AppError::internal("Watch stopped without a terminal status"))
}

/// Like [`watch_job`], but stops early when `cancel` turns `true`.
///
/// Cancelling abandons the handle on the tracker and returns `Ok(None)`. The
/// job keeps running in the worker pool.
pub async fn watch_job_until<F>(
    tracker: &mut ProgressTracker,
    handle: TaskHandle,
    period: Duration,
    mut cancel: watch::Receiver<bool>,
    mut render: F,
) -> AppResult<Option<ProgressView>>
where
    F: FnMut(&ProgressView),
{
    let mut interval = time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut cancel_open = true;

    loop {
        if *cancel.borrow() {
            tracker.abandon();
            tracing::debug!(%handle, "Stopped watching job");
            return Ok(None);
        }

        tokio::select! {
            changed = cancel.changed(), if cancel_open => {
                if changed.is_err() {
                    cancel_open = false;
                }
            }
            _ = interval.tick() => {
                // Polls run one at a time: the next tick is not awaited
                // before this read finishes.
                let view = tracker.poll_once(handle).await?;
                render(&view);
                if view.is_terminal() {
                    tracing::debug!(%handle, "Watch loop ended");
                    return Ok(Some(view));
                }
            }
        }
    }
}
