//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from an
//! optional TOML file, an optional environment overlay, and `DOCHARVEST__*`
//! environment variables. Each sub-module represents a logical section.

pub mod logging;
pub mod queue;
pub mod store;
pub mod tracker;
pub mod worker;

use serde::{Deserialize, Serialize};

use self::logging::LoggingConfig;
use self::queue::QueueConfig;
use self::store::StoreConfig;
use self::tracker::{ProbeConfig, TrackerConfig};
use self::worker::WorkerConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Task queue backend settings.
    pub queue: QueueConfig,
    /// Result store settings.
    pub store: StoreConfig,
    /// Destination storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Progress tracker settings.
    #[serde(default)]
    pub tracker: TrackerConfig,
    /// Queue health probe settings.
    #[serde(default)]
    pub probe: ProbeConfig,
    /// Worker pool settings.
    #[serde(default)]
    pub worker: WorkerConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Destination storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage location used when the operator does not name one.
    #[serde(default)]
    pub default_destination: String,
}

impl AppConfig {
    /// Load configuration from a TOML file, an environment overlay, and
    /// environment variables prefixed with `DOCHARVEST__`.
    ///
    /// The overlay file is `config/{DOCHARVEST_ENV}.toml` (default
    /// `development`). Both files are optional; the required values are
    /// checked by [`AppConfig::validate`] before returning.
    pub fn load(path: &str) -> Result<Self, AppError> {
        let env = std::env::var("DOCHARVEST_ENV").unwrap_or_else(|_| "development".to_string());
        tracing::debug!(path, env = %env, "Loading configuration");

        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("DOCHARVEST")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Parse and validate configuration from an in-memory TOML document.
    pub fn from_toml(source: &str) -> Result<Self, AppError> {
        let config: Self = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Check that every required value is present.
    pub fn validate(&self) -> Result<(), AppError> {
        let required = [
            ("queue.url", self.queue.url.as_str()),
            ("store.url", self.store.url.as_str()),
            (
                "storage.default_destination",
                self.storage.default_destination.as_str(),
            ),
        ];

        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(key, _)| *key)
            .collect();

        if !missing.is_empty() {
            return Err(AppError::configuration(format!(
                "Missing required configuration: {}",
                missing.join(", ")
            )));
        }

        if self.tracker.poll_interval_seconds == 0 {
            return Err(AppError::configuration(
                "tracker.poll_interval_seconds must be greater than zero",
            ));
        }

        if self.probe.check_interval_millis == 0 {
            return Err(AppError::configuration(
                "probe.check_interval_millis must be greater than zero",
            ));
        }

        Ok(())
    }
}
