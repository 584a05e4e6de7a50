//! Integration tests for the queue health probe.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::time::Instant;

use docharvest_core::types::TaskEnvelope;
use docharvest_entity::HealthProbeResult;
use docharvest_entity::job::payload::PING_TASK;
use docharvest_worker::{JobExecutionError, JobHandler, ProgressReporter};

use crate::helpers::{FakeDocumentApi, TestHarness};

/// Ping handler with a canned answer.
#[derive(Debug)]
struct CannedPing(Result<&'static str, &'static str>);

#[async_trait]
impl JobHandler for CannedPing {
    fn job_type(&self) -> &str {
        PING_TASK
    }

    async fn execute(
        &self,
        _task: &TaskEnvelope,
        _progress: &mut ProgressReporter,
    ) -> Result<Option<Value>, JobExecutionError> {
        match self.0 {
            Ok(reply) => Ok(Some(Value::String(reply.to_string()))),
            Err(reason) => Err(JobExecutionError::Permanent(reason.to_string())),
        }
    }
}

fn with_ping(answer: Result<&'static str, &'static str>) -> TestHarness {
    let ping: Arc<dyn JobHandler> = Arc::new(CannedPing(answer));
    TestHarness::start_with(FakeDocumentApi::default(), vec![ping])
}

#[tokio::test(start_paused = true)]
async fn test_probe_against_running_worker_is_ok() {
    let harness = TestHarness::start();
    let session = harness.session();

    assert_eq!(session.probe_health().await, HealthProbeResult::Ok);

    harness.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_wrong_echo_is_unexpected_response() {
    let harness = with_ping(Ok("pang"));
    let session = harness.session();

    let result = session.probe_health().await;
    assert_eq!(result, HealthProbeResult::UnexpectedResponse("pang".into()));
    assert_ne!(result, HealthProbeResult::TimedOut);

    harness.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_failing_ping_is_execution_failure() {
    let harness = with_ping(Err("worker misconfigured"));
    let session = harness.session();

    assert_eq!(
        session.probe_health().await,
        HealthProbeResult::ExecutionFailed("worker misconfigured".into())
    );

    harness.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_probe_without_worker_times_out_on_deadline() {
    let harness = TestHarness::without_worker();
    let session = harness.session();
    let timeout = Duration::from_secs(2);

    let started = Instant::now();
    let result = session.probe_health_within(timeout).await;
    let elapsed = started.elapsed();

    assert_eq!(result, HealthProbeResult::TimedOut);
    assert!(elapsed >= timeout);
    assert!(elapsed <= timeout + Duration::from_millis(10), "{elapsed:?}");
}
