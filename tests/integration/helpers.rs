//! Shared test helpers for integration tests.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::NaiveDate;
use tokio::sync::watch;

use docharvest_client::Session;
use docharvest_core::config::store::MemoryStoreConfig;
use docharvest_core::config::tracker::{ProbeConfig, TrackerConfig};
use docharvest_core::config::worker::WorkerConfig;
use docharvest_entity::{DateRange, DocumentKind};
use docharvest_store::ResultStore;
use docharvest_store::memory::{MemoryCacheProvider, MemoryTaskQueue};
use docharvest_worker::jobs::{
    DocumentRef, DocumentSink, DocumentSource, PingJobHandler, ProcessDocumentsHandler,
};
use docharvest_worker::{JobExecutor, JobHandler, WorkerRunner};

/// Parse a `YYYY-MM-DD` date.
pub fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

/// Document API fake: every identifier has one document of each kind per
/// quarter of 2024, except identifiers listed as broken.
#[derive(Debug, Default)]
pub struct FakeDocumentApi {
    pub broken: Vec<String>,
}

#[async_trait]
impl DocumentSource for FakeDocumentApi {
    async fn list(
        &self,
        identifier: &str,
        _range: DateRange,
        _kinds: &BTreeSet<DocumentKind>,
    ) -> anyhow::Result<Vec<DocumentRef>> {
        if self.broken.iter().any(|b| b == identifier) {
            anyhow::bail!("document API rejected identifier {identifier}");
        }

        let mut documents = Vec::new();
        for day in ["2024-02-15", "2024-05-15", "2024-08-15", "2024-11-15"] {
            for kind in DocumentKind::ALL {
                documents.push(DocumentRef {
                    identifier: identifier.to_string(),
                    kind,
                    date: date(day),
                    name: format!("{kind}.bin"),
                    locator: format!("fake://{identifier}/{day}/{kind}"),
                });
            }
        }
        Ok(documents)
    }

    async fn fetch(&self, document: &DocumentRef) -> anyhow::Result<Bytes> {
        Ok(Bytes::from(document.locator.clone()))
    }
}

/// Object storage fake recording every stored key.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub keys: Mutex<Vec<String>>,
}

#[async_trait]
impl DocumentSink for MemorySink {
    async fn store(&self, destination: &str, key: &str, _body: Bytes) -> anyhow::Result<()> {
        self.keys
            .lock()
            .unwrap()
            .push(format!("{destination}/{key}"));
        Ok(())
    }
}

/// In-process deployment: memory queue and store, one worker pool, and an
/// operator session over the same backends.
pub struct TestHarness {
    pub queue: MemoryTaskQueue,
    pub store: ResultStore,
    pub sink: Arc<MemorySink>,
    shutdown: Option<watch::Sender<bool>>,
    worker: Option<tokio::task::JoinHandle<()>>,
}

impl TestHarness {
    /// Backends only, no worker running.
    pub fn without_worker() -> Self {
        let provider = MemoryCacheProvider::new(&MemoryStoreConfig::default());
        Self {
            queue: MemoryTaskQueue::new(),
            store: ResultStore::new(Arc::new(provider), Duration::from_secs(3600)),
            sink: Arc::new(MemorySink::default()),
            shutdown: None,
            worker: None,
        }
    }

    /// Backends plus a worker with the standard handlers.
    pub fn start() -> Self {
        Self::start_with(FakeDocumentApi::default(), Vec::new())
    }

    /// Backends plus a worker; `extra` handlers replace the standard ones
    /// registered under the same task name.
    pub fn start_with(api: FakeDocumentApi, extra: Vec<Arc<dyn JobHandler>>) -> Self {
        let mut harness = Self::without_worker();

        let mut executor = JobExecutor::new();
        executor.register(Arc::new(PingJobHandler));
        executor.register(Arc::new(ProcessDocumentsHandler::new(
            Arc::new(api),
            harness.sink.clone(),
        )));
        for handler in extra {
            executor.register(handler);
        }

        let runner = WorkerRunner::new(
            Arc::new(harness.queue.clone()),
            harness.store.clone(),
            Arc::new(executor),
            WorkerConfig {
                concurrency: 2,
                dequeue_wait_seconds: 1,
                shutdown_grace_seconds: 5,
            },
            "integration-worker".to_string(),
        );

        let (shutdown, cancel) = watch::channel(false);
        harness.worker = Some(tokio::spawn(async move { runner.run(cancel).await }));
        harness.shutdown = Some(shutdown);
        harness
    }

    /// Operator session over the harness backends.
    pub fn session(&self) -> Session {
        Session::new(
            Arc::new(self.queue.clone()),
            self.store.clone(),
            &TrackerConfig {
                poll_interval_seconds: 1,
                missing_grace_seconds: 5,
            },
            &ProbeConfig {
                timeout_seconds: 3,
                check_interval_millis: 50,
            },
        )
    }

    /// Stop the worker and wait for it to exit.
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(true);
        }
        if let Some(worker) = self.worker.take() {
            worker.await.unwrap();
        }
    }
}
