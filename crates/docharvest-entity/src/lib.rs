//! # docharvest-entity
//!
//! Domain value objects for DocHarvest: the immutable job request handed to
//! the queue, the status snapshots workers write back, the raw task outcomes,
//! and the classified health probe result.

pub mod job;
pub mod probe;

pub use job::{
    DateRange, DocumentKind, JobRequest, ProgressCounts, StatusSnapshot, TaskOutcome, build_job,
};
pub use probe::HealthProbeResult;
