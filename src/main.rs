//! DocHarvest worker daemon.
//!
//! Consumes tasks from the configured queue and records their snapshots and
//! outcomes in the result store until Ctrl+C or SIGTERM.
//!
//! This binary only answers the `ping` health task. Document jobs need a
//! `ProcessDocumentsHandler` wired to a concrete `DocumentSource` and
//! `DocumentSink`; a deployment registers it on the executor next to
//! `PingJobHandler`. Until then `process_documents` tasks fail as unknown.

use std::sync::Arc;

use tokio::sync::watch;
use tracing;
use tracing_subscriber::{EnvFilter, fmt};

use docharvest_core::config::AppConfig;
use docharvest_core::error::AppError;
use docharvest_entity::job::payload::PROCESS_DOCUMENTS_TASK;
use docharvest_store::{ResultStore, connect_queue};
use docharvest_worker::jobs::PingJobHandler;
use docharvest_worker::{JobExecutor, WorkerRunner};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Worker error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("DOCHARVEST_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());
    AppConfig::load(&config_path)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting DocHarvest worker v{}", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        "Connecting result store (provider: {})...",
        config.store.provider
    );
    let store = ResultStore::connect(&config.store).await?;

    tracing::info!(
        "Connecting task queue '{}' (provider: {})...",
        config.queue.name,
        config.queue.provider
    );
    let queue = connect_queue(&config.queue).await?;

    let mut executor = JobExecutor::new();
    executor.register(Arc::new(PingJobHandler));
    if !executor.has_handler(PROCESS_DOCUMENTS_TASK) {
        tracing::warn!(
            task = PROCESS_DOCUMENTS_TASK,
            "No document handler registered; submitted jobs will fail"
        );
    }

    let worker_id = format!("worker-{}", std::process::id());
    let runner = WorkerRunner::new(
        queue,
        store,
        Arc::new(executor),
        config.worker.clone(),
        worker_id,
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker = tokio::spawn(async move { runner.run(shutdown_rx).await });

    shutdown_signal().await;
    tracing::info!("Shutdown signal received, stopping worker...");
    let _ = shutdown_tx.send(true);

    worker
        .await
        .map_err(|e| AppError::internal(format!("Worker task failed: {}", e)))?;

    tracing::info!("DocHarvest worker shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
