//! Classified result of a queue health probe.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of one probe round-trip. Returned by value, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", content = "detail", rename_all = "snake_case")]
pub enum HealthProbeResult {
    /// The worker echoed the expected sentinel.
    Ok,
    /// The worker answered with something other than the sentinel.
    UnexpectedResponse(String),
    /// The ping task failed while executing.
    ExecutionFailed(String),
    /// No answer arrived before the deadline.
    TimedOut,
    /// The ping could not be enqueued or its result could not be read.
    Unreachable(String),
}

impl HealthProbeResult {
    /// Whether it is safe to submit real work.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Operator-facing message; each variant reads differently.
    pub fn message(&self) -> String {
        match self {
            Self::Ok => "Queue connection successful".to_string(),
            Self::UnexpectedResponse(value) => {
                format!("Unexpected response from queue: {value}")
            }
            Self::ExecutionFailed(reason) => format!("Task execution failed: {reason}"),
            Self::TimedOut => {
                "Queue connection timed out. Worker might be unavailable".to_string()
            }
            Self::Unreachable(reason) => format!("Queue connection failed: {reason}"),
        }
    }
}

impl fmt::Display for HealthProbeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}
