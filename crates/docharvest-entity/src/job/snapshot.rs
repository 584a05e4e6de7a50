//! Status snapshots written by workers into the result store.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Progress counters of a running job.
///
/// Invariants: `processed <= total` and `succeeded + failed <= processed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressCounts {
    /// Documents handled so far.
    pub processed: u64,
    /// Documents discovered for the job.
    pub total: u64,
    /// Documents stored successfully.
    pub succeeded: u64,
    /// Documents that could not be stored.
    pub failed: u64,
}

impl ProgressCounts {
    /// Fraction of work done in `[0.0, 1.0]`. Zero when `total` is zero.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.processed as f64 / self.total as f64).min(1.0)
        }
    }

    /// Field-wise maximum of two observations of the same job.
    pub fn max(self, other: Self) -> Self {
        let processed = self.processed.max(other.processed);
        Self {
            processed,
            total: self.total.max(other.total).max(processed),
            succeeded: self.succeeded.max(other.succeeded),
            failed: self.failed.max(other.failed),
        }
    }
}

/// Point-in-time status of one job, keyed by task handle in the result store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StatusSnapshot {
    /// Accepted by a worker, no documents handled yet.
    Pending,
    /// Documents are being retrieved and stored.
    InProgress {
        /// Documents handled so far.
        processed: u64,
        /// Documents discovered for the job.
        total: u64,
        /// Documents stored successfully.
        succeeded: u64,
        /// Documents that could not be stored.
        failed: u64,
    },
    /// All documents handled.
    Complete {
        /// Documents discovered for the job.
        total: u64,
        /// Documents stored successfully.
        succeeded: u64,
        /// Documents that could not be stored.
        failed: u64,
    },
    /// The job itself failed.
    Failed {
        /// Reason reported by the worker.
        error: String,
    },
}

impl StatusSnapshot {
    /// Build an `InProgress` snapshot from counters.
    pub fn in_progress(counts: ProgressCounts) -> Self {
        Self::InProgress {
            processed: counts.processed,
            total: counts.total,
            succeeded: counts.succeeded,
            failed: counts.failed,
        }
    }

    /// Check if the snapshot is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete { .. } | Self::Failed { .. })
    }

    /// Progress counters carried by the snapshot, if any.
    ///
    /// `Pending` reports all zeros; `Complete` reports `processed == total`.
    pub fn counts(&self) -> Option<ProgressCounts> {
        match self {
            Self::Pending => Some(ProgressCounts::default()),
            Self::InProgress {
                processed,
                total,
                succeeded,
                failed,
            } => Some(ProgressCounts {
                processed: *processed,
                total: *total,
                succeeded: *succeeded,
                failed: *failed,
            }),
            Self::Complete {
                total,
                succeeded,
                failed,
            } => Some(ProgressCounts {
                processed: *total,
                total: *total,
                succeeded: *succeeded,
                failed: *failed,
            }),
            Self::Failed { .. } => None,
        }
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress { .. } => "in_progress",
            Self::Complete { .. } => "complete",
            Self::Failed { .. } => "failed",
        }
    }
}

impl fmt::Display for StatusSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
