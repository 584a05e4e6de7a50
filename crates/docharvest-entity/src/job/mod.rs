//! Batch job domain entities.

pub mod builder;
pub mod kind;
pub mod outcome;
pub mod payload;
pub mod request;
pub mod snapshot;

pub use builder::build_job;
pub use kind::DocumentKind;
pub use outcome::TaskOutcome;
pub use request::{DateRange, JobRequest};
pub use snapshot::{ProgressCounts, StatusSnapshot};
