//! Opaque task handle issued by the queue on submission.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of one submitted task.
///
/// Owned by the submitting session for the lifetime of one job and used as
/// the result store key for that job's snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskHandle(pub Uuid);

impl TaskHandle {
    /// Mint a new handle. Handles are time-ordered (UUIDv7).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Create a handle from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Return the inner UUID value.
    pub fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl Default for TaskHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskHandle {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

impl From<Uuid> for TaskHandle {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}
