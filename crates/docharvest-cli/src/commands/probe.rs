//! Queue health probe command.

use std::time::Duration;

use clap::Args;

use crate::output::{self, OutputFormat};
use docharvest_core::error::AppError;

/// Arguments for the probe command
#[derive(Debug, Args)]
pub struct ProbeArgs {
    /// Seconds to wait for a worker to answer; defaults to `probe.timeout_seconds`
    #[arg(short, long)]
    pub timeout: Option<u64>,
}

/// Execute the probe command
pub async fn execute(
    args: &ProbeArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let session = super::connect_session(&config).await?;

    let timeout = args
        .timeout
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.probe.timeout());
    let result = session.probe_health_within(timeout).await;

    match format {
        OutputFormat::Json => output::print_event(&result, format),
        OutputFormat::Table if result.is_ok() => output::print_success(&result.message()),
        OutputFormat::Table => {}
    }

    if result.is_ok() {
        Ok(())
    } else {
        Err(AppError::queue_unavailable(result.message()))
    }
}
