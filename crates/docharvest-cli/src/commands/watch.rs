//! Job progress command.

use clap::Args;

use crate::output::OutputFormat;
use docharvest_core::error::AppError;
use docharvest_core::types::TaskHandle;

/// Arguments for the watch command
#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Handle printed by `submit`
    pub handle: TaskHandle,
}

/// Execute the watch command
pub async fn execute(
    args: &WatchArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let mut session = super::connect_session(&config).await?;

    session.attach(args.handle)?;
    super::follow(&mut session, args.handle, format).await
}
