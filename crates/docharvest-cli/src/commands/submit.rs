//! Job submission command.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use clap::Args;
use tokio::io::AsyncReadExt;

use crate::output::{self, OutputFormat};
use docharvest_client::build_job;
use docharvest_core::error::AppError;
use docharvest_entity::DocumentKind;

/// Arguments for the submit command
#[derive(Debug, Args)]
pub struct SubmitArgs {
    /// File with one identifier per line (`-` reads stdin)
    #[arg(short, long, default_value = "-")]
    pub identifiers: PathBuf,

    /// First day of the date range (YYYY-MM-DD)
    #[arg(long)]
    pub start: NaiveDate,

    /// Last day of the date range (YYYY-MM-DD)
    #[arg(long)]
    pub end: NaiveDate,

    /// Document kinds to retrieve (slides, report, transcript, audio)
    #[arg(short, long = "kind", value_delimiter = ',')]
    pub kinds: Vec<DocumentKind>,

    /// Destination storage location; defaults to `storage.default_destination`
    #[arg(short, long)]
    pub destination: Option<String>,

    /// Follow progress until the job finishes
    #[arg(short, long)]
    pub watch: bool,

    /// Submit without checking queue health first
    #[arg(long)]
    pub skip_probe: bool,

    /// Submit even if the health probe fails, without asking
    #[arg(short, long)]
    pub yes: bool,

    /// Health probe timeout in seconds; defaults to `probe.timeout_seconds`
    #[arg(long)]
    pub probe_timeout: Option<u64>,
}

/// Execute the submit command
pub async fn execute(
    args: &SubmitArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;

    let raw = read_identifiers(&args.identifiers).await?;
    let destination = args
        .destination
        .as_deref()
        .unwrap_or(&config.storage.default_destination);
    let request = build_job(&raw, args.start, args.end, &args.kinds, destination)?;

    let mut session = super::connect_session(&config).await?;

    if !args.skip_probe {
        let timeout = args
            .probe_timeout
            .map(Duration::from_secs)
            .unwrap_or_else(|| config.probe.timeout());
        let health = session.probe_health_within(timeout).await;
        if health.is_ok() {
            output::print_success(&health.message());
        } else {
            output::print_warning(&health.message());
            if !args.yes && !confirm("Submit the job anyway?")? {
                println!("Cancelled.");
                return Ok(());
            }
        }
    }

    let handle = session.submit(&request).await?;

    output::print_success(&format!("Job submitted (handle: {handle})"));
    output::print_kv("Identifiers", &request.identifiers().len().to_string());
    output::print_kv(
        "Date range",
        &format!("{} .. {}", request.date_range().start, request.date_range().end),
    );
    output::print_kv(
        "Kinds",
        &request
            .kinds()
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    );
    output::print_kv("Destination", request.destination());

    if args.watch {
        super::follow(&mut session, handle, format).await?;
    }

    Ok(())
}

async fn read_identifiers(path: &Path) -> Result<String, AppError> {
    if path.as_os_str() == "-" {
        let mut raw = String::new();
        tokio::io::stdin()
            .read_to_string(&mut raw)
            .await
            .map_err(|e| AppError::validation(format!("Failed to read identifiers from stdin: {}", e)))?;
        Ok(raw)
    } else {
        tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::validation(format!(
                "Failed to read identifiers from '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

fn confirm(prompt: &str) -> Result<bool, AppError> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {}", e)))
}
