//! Raw task outcome recorded by the worker pool for every task it runs.

use serde::{Deserialize, Serialize};

/// What a task returned, as recorded in the result store.
///
/// Snapshots describe a batch job's progress; the outcome is the task's
/// plain return value (or error), which is what the health probe reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TaskOutcome {
    /// The handler returned a value.
    Succeeded {
        /// Value returned by the handler (`null` when it returned nothing).
        value: serde_json::Value,
    },
    /// The handler failed during execution.
    Failed {
        /// Failure reason reported by the handler.
        reason: String,
    },
}
