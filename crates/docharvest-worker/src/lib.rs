//! Reference worker pool for DocHarvest.
//!
//! This crate provides:
//! - A worker runner that dequeues tasks and executes them with bounded concurrency
//! - A job executor that dispatches tasks to the handler registered for their name
//! - A progress reporter handlers use to publish status snapshots
//! - Built-in handlers for the `ping` probe and the `process_documents` batch job

pub mod executor;
pub mod jobs;
pub mod progress;
pub mod runner;

pub use executor::{JobExecutionError, JobExecutor, JobHandler};
pub use progress::ProgressReporter;
pub use runner::WorkerRunner;
