//! Task queue provider selection.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::info;

use docharvest_core::config::queue::QueueConfig;
use docharvest_core::error::AppError;
use docharvest_core::result::AppResult;
use docharvest_core::traits::queue::TaskQueue;

/// Stand-in for a wait too long to represent as an instant.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Instant `wait` from now, saturating instead of overflowing for huge waits.
pub fn deadline_after(wait: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(wait).unwrap_or_else(|| now + FAR_FUTURE)
}

/// Connect to the configured task queue backend.
///
/// The `memory` provider only connects producers and consumers living in the
/// same process; it exists for tests and single-process runs.
pub async fn connect_queue(config: &QueueConfig) -> AppResult<Arc<dyn TaskQueue>> {
    match config.provider.as_str() {
        #[cfg(feature = "redis-backend")]
        "redis" => {
            info!(queue = %config.name, "Initializing Redis task queue");
            let queue =
                crate::redis::RedisTaskQueue::connect(&config.url, &config.key_prefix, &config.name)
                    .await?;
            Ok(Arc::new(queue))
        }
        #[cfg(feature = "memory")]
        "memory" => {
            info!(queue = %config.name, "Initializing in-memory task queue");
            Ok(Arc::new(crate::memory::MemoryTaskQueue::new()))
        }
        other => Err(AppError::configuration(format!(
            "Unknown queue provider: '{other}'. Supported: memory, redis"
        ))),
    }
}
