//! Queue round-trip probe handler.

use async_trait::async_trait;
use serde_json::Value;

use docharvest_core::types::TaskEnvelope;
use docharvest_entity::job::payload::{PING_RESPONSE, PING_TASK};

use crate::executor::{JobExecutionError, JobHandler};
use crate::progress::ProgressReporter;

/// Answers every `ping` with the `"pong"` sentinel.
#[derive(Debug, Default)]
pub struct PingJobHandler;

#[async_trait]
impl JobHandler for PingJobHandler {
    fn job_type(&self) -> &str {
        PING_TASK
    }

    async fn execute(
        &self,
        _task: &TaskEnvelope,
        _progress: &mut ProgressReporter,
    ) -> Result<Option<Value>, JobExecutionError> {
        Ok(Some(Value::String(PING_RESPONSE.to_string())))
    }
}
