//! # docharvest-client
//!
//! Caller side of DocHarvest: everything an operator-facing front end needs
//! to turn raw input into a queued job and observe it to completion.
//!
//! - [`build_job`] validates operator input into an immutable
//!   [`JobRequest`](docharvest_entity::JobRequest)
//! - [`Dispatcher`] hands the request to the task queue
//! - [`ProgressTracker`] polls the result store and renders monotonic progress
//! - [`watch_job`] drives the tracker from a repeating timer
//! - [`HealthProber`] checks queue reachability with a bounded wait
//! - [`Session`] ties the above together with single-flight submission

pub mod dispatcher;
pub mod probe;
pub mod session;
pub mod ticker;
pub mod tracker;

pub use dispatcher::Dispatcher;
pub use docharvest_entity::build_job;
pub use probe::HealthProber;
pub use session::Session;
pub use ticker::{watch_job, watch_job_until};
pub use tracker::{ProgressTracker, ProgressView, TrackerState};
