//! CLI command definitions and dispatch.

pub mod config;
pub mod probe;
pub mod submit;
pub mod watch;

use clap::{Parser, Subcommand};
use tokio::sync::watch as signal;

use crate::output::{self, OutputFormat};
use docharvest_client::{ProgressView, Session};
use docharvest_core::config::AppConfig;
use docharvest_core::error::AppError;
use docharvest_core::types::TaskHandle;

/// DocHarvest: batch document retrieval jobs
#[derive(Debug, Parser)]
#[command(name = "docharvest", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate and submit a batch job
    ///
    /// Jobs only run against workers that register a `process_documents`
    /// handler. The stock `docharvest-worker` daemon answers `ping` alone.
    Submit(submit::SubmitArgs),
    /// Follow the progress of a submitted job
    Watch(watch::WatchArgs),
    /// Check that the queue and a worker answer
    Probe(probe::ProbeArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Submit(args) => submit::execute(args, &self.config, self.format).await,
            Commands::Watch(args) => watch::execute(args, &self.config, self.format).await,
            Commands::Probe(args) => probe::execute(args, &self.config, self.format).await,
            Commands::Config(args) => config::execute(args, &self.config, self.format).await,
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path)
}

/// Helper: connect a session from configuration
pub async fn connect_session(config: &AppConfig) -> Result<Session, AppError> {
    Session::connect(config).await
}

/// Helper: follow a tracked job until it finishes or Ctrl+C is pressed.
///
/// A failed job is returned as an error so the process exits non-zero.
pub async fn follow(
    session: &mut Session,
    handle: TaskHandle,
    format: OutputFormat,
) -> Result<(), AppError> {
    let (stop_tx, stop_rx) = signal::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = stop_tx.send(true);
        }
    });

    let last = session
        .watch_until(handle, stop_rx, |view| output::print_event(view, format))
        .await?;

    match last {
        None => {
            output::print_warning(&format!(
                "Stopped watching job {handle}; it keeps running. Resume with `docharvest watch {handle}`"
            ));
            Ok(())
        }
        Some(ProgressView::Failed { reason }) => Err(AppError::internal(format!(
            "Job {handle} failed: {reason}"
        ))),
        Some(_) => {
            output::print_success(&format!("Job {handle} complete"));
            Ok(())
        }
    }
}
