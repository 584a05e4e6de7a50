//! Job executor: dispatches tasks to registered handlers.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing;

use docharvest_core::error::AppError;
use docharvest_core::types::TaskEnvelope;

use crate::progress::ProgressReporter;

/// Trait for task handler implementations
#[async_trait]
pub trait JobHandler: Send + Sync + std::fmt::Debug {
    /// Get the task name this handler processes
    fn job_type(&self) -> &str;

    /// Execute the task. Handlers that track progress publish snapshots
    /// through `progress`; the returned value becomes the task outcome.
    async fn execute(
        &self,
        task: &TaskEnvelope,
        progress: &mut ProgressReporter,
    ) -> Result<Option<Value>, JobExecutionError>;
}

/// Error from task execution
#[derive(Debug, thiserror::Error)]
pub enum JobExecutionError {
    /// Permanent failure: the payload can never succeed
    #[error("Permanent job failure: {0}")]
    Permanent(String),

    /// Transient failure: an external collaborator was unavailable
    #[error("Transient job failure: {0}")]
    Transient(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] AppError),
}

impl JobExecutionError {
    /// Reason string recorded in the result store.
    pub fn reason(&self) -> String {
        match self {
            Self::Permanent(msg) | Self::Transient(msg) => msg.clone(),
            Self::Internal(err) => err.message.clone(),
        }
    }
}

/// Dispatches tasks to the appropriate handler based on task name
#[derive(Debug, Default)]
pub struct JobExecutor {
    /// Registered handlers by task name
    handlers: HashMap<String, Arc<dyn JobHandler>>,
}

impl JobExecutor {
    /// Create a new job executor
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a job handler
    pub fn register(&mut self, handler: Arc<dyn JobHandler>) {
        let job_type = handler.job_type().to_string();
        tracing::info!("Registered job handler for type '{}'", job_type);
        self.handlers.insert(job_type, handler);
    }

    /// Execute a task by dispatching to the correct handler
    pub async fn execute(
        &self,
        task: &TaskEnvelope,
        progress: &mut ProgressReporter,
    ) -> Result<Option<Value>, JobExecutionError> {
        let handler = self.handlers.get(&task.task).ok_or_else(|| {
            JobExecutionError::Permanent(format!(
                "No handler registered for job type '{}'",
                task.task
            ))
        })?;

        tracing::info!(handle = %task.id, task = %task.task, "Executing task");

        handler.execute(task, progress).await
    }

    /// Check if a handler is registered for a task name
    pub fn has_handler(&self, job_type: &str) -> bool {
        self.handlers.contains_key(job_type)
    }

    /// Get the list of registered task names
    pub fn registered_types(&self) -> Vec<String> {
        self.handlers.keys().cloned().collect()
    }
}
