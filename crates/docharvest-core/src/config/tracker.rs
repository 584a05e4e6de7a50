//! Progress tracker and health probe configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Progress tracker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Fixed interval between polls of the result store.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    /// How long a submitted job may be absent from the result store before
    /// the tracker declares it lost. Two worker write intervals by default.
    #[serde(default = "default_missing_grace")]
    pub missing_grace_seconds: u64,
}

impl TrackerConfig {
    /// Poll interval as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }

    /// Missing-snapshot grace period as a [`Duration`].
    pub fn missing_grace(&self) -> Duration {
        Duration::from_secs(self.missing_grace_seconds)
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            poll_interval_seconds: default_poll_interval(),
            missing_grace_seconds: default_missing_grace(),
        }
    }
}

/// Queue health probe configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Default bounded wait for the ping round-trip.
    #[serde(default = "default_probe_timeout")]
    pub timeout_seconds: u64,
    /// Interval between result store checks while waiting.
    #[serde(default = "default_check_interval")]
    pub check_interval_millis: u64,
}

impl ProbeConfig {
    /// Probe timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Check interval as a [`Duration`].
    pub fn check_interval(&self) -> Duration {
        Duration::from_millis(self.check_interval_millis)
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_probe_timeout(),
            check_interval_millis: default_check_interval(),
        }
    }
}

fn default_poll_interval() -> u64 {
    10
}

fn default_missing_grace() -> u64 {
    30
}

fn default_probe_timeout() -> u64 {
    15
}

fn default_check_interval() -> u64 {
    100
}
