//! Batch document retrieval job.
//!
//! For every identifier of a [`JobRequest`] the handler lists the matching
//! documents through a [`DocumentSource`], then copies each one into the
//! requested destination through a [`DocumentSink`], publishing progress
//! after every document. The retrieval API and the object storage are
//! collaborators behind the two traits.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing;

use docharvest_core::types::TaskEnvelope;
use docharvest_entity::job::payload::PROCESS_DOCUMENTS_TASK;
use docharvest_entity::{DateRange, DocumentKind, JobRequest};

use crate::executor::{JobExecutionError, JobHandler};
use crate::progress::ProgressReporter;

/// A document available from the retrieval API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    /// Identifier the document belongs to.
    pub identifier: String,
    /// Kind of document.
    pub kind: DocumentKind,
    /// Event date of the document.
    pub date: NaiveDate,
    /// File name, including extension.
    pub name: String,
    /// Source-specific locator (URL, id, ...).
    pub locator: String,
}

impl DocumentRef {
    /// Object key under which the document is stored in the destination.
    pub fn object_key(&self) -> String {
        format!(
            "{}/{}/{}_{}",
            self.identifier, self.kind, self.date, self.name
        )
    }
}

/// Document retrieval API.
#[async_trait]
pub trait DocumentSource: Send + Sync + std::fmt::Debug {
    /// List the documents of one identifier within the range and kinds.
    async fn list(
        &self,
        identifier: &str,
        range: DateRange,
        kinds: &BTreeSet<DocumentKind>,
    ) -> anyhow::Result<Vec<DocumentRef>>;

    /// Download one document.
    async fn fetch(&self, document: &DocumentRef) -> anyhow::Result<Bytes>;
}

/// Object storage the documents are copied into.
#[async_trait]
pub trait DocumentSink: Send + Sync + std::fmt::Debug {
    /// Store one object in the named destination.
    async fn store(&self, destination: &str, key: &str, body: Bytes) -> anyhow::Result<()>;
}

/// Handles `process_documents` tasks.
#[derive(Debug)]
pub struct ProcessDocumentsHandler {
    source: Arc<dyn DocumentSource>,
    sink: Arc<dyn DocumentSink>,
}

impl ProcessDocumentsHandler {
    /// Create a new handler over the given collaborators.
    pub fn new(source: Arc<dyn DocumentSource>, sink: Arc<dyn DocumentSink>) -> Self {
        Self { source, sink }
    }

    async fn collect(&self, request: &JobRequest) -> Result<Vec<DocumentRef>, JobExecutionError> {
        let range = request.date_range();
        let mut documents = Vec::new();

        for identifier in request.identifiers() {
            let found = self
                .source
                .list(identifier, range, request.kinds())
                .await
                .map_err(|e| {
                    JobExecutionError::Transient(format!(
                        "failed to list documents for {identifier}: {e:#}"
                    ))
                })?;

            documents.extend(
                found
                    .into_iter()
                    .filter(|doc| request.kinds().contains(&doc.kind) && range.contains(doc.date)),
            );
        }

        Ok(documents)
    }

    async fn transfer(&self, destination: &str, document: &DocumentRef) -> anyhow::Result<()> {
        let body = self.source.fetch(document).await?;
        self.sink
            .store(destination, &document.object_key(), body)
            .await
    }
}

#[async_trait]
impl JobHandler for ProcessDocumentsHandler {
    fn job_type(&self) -> &str {
        PROCESS_DOCUMENTS_TASK
    }

    async fn execute(
        &self,
        task: &TaskEnvelope,
        progress: &mut ProgressReporter,
    ) -> Result<Option<Value>, JobExecutionError> {
        let request: JobRequest = serde_json::from_value(task.payload.clone())
            .map_err(|e| JobExecutionError::Permanent(format!("invalid job payload: {e}")))?;

        progress.pending().await?;

        let documents = self.collect(&request).await?;
        tracing::info!(
            handle = %task.id,
            identifiers = request.identifiers().len(),
            documents = documents.len(),
            destination = request.destination(),
            "Processing documents"
        );
        progress.begin(documents.len() as u64).await?;

        for document in &documents {
            let stored = self.transfer(request.destination(), document).await;
            if let Err(e) = &stored {
                tracing::warn!(
                    handle = %task.id,
                    key = %document.object_key(),
                    "Failed to store document: {:#}",
                    e
                );
            }
            progress.record(stored.is_ok()).await?;
        }

        let counts = progress.complete().await?;
        Ok(Some(json!({
            "total": counts.total,
            "succeeded": counts.succeeded,
            "failed": counts.failed,
        })))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;
    use docharvest_core::config::store::MemoryStoreConfig;
    use docharvest_core::types::TaskHandle;
    use docharvest_entity::{StatusSnapshot, build_job};
    use docharvest_store::ResultStore;
    use docharvest_store::memory::MemoryCacheProvider;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[derive(Debug, Default)]
    struct FakeSource {
        broken_identifier: Option<String>,
    }

    #[async_trait]
    impl DocumentSource for FakeSource {
        async fn list(
            &self,
            identifier: &str,
            _range: DateRange,
            _kinds: &BTreeSet<DocumentKind>,
        ) -> anyhow::Result<Vec<DocumentRef>> {
            if self.broken_identifier.as_deref() == Some(identifier) {
                anyhow::bail!("rate limited");
            }
            let doc = |kind, day, name: &str| DocumentRef {
                identifier: identifier.to_string(),
                kind,
                date: date(2024, 3, day),
                name: name.to_string(),
                locator: format!("https://api.example/{identifier}/{name}"),
            };
            Ok(vec![
                doc(DocumentKind::Slides, 1, "q1.pdf"),
                doc(DocumentKind::Report, 2, "corrupt.pdf"),
                doc(DocumentKind::Audio, 3, "call.mp3"),
            ])
        }

        async fn fetch(&self, document: &DocumentRef) -> anyhow::Result<Bytes> {
            if document.name == "corrupt.pdf" {
                anyhow::bail!("404 from document API");
            }
            Ok(Bytes::from(document.locator.clone()))
        }
    }

    #[derive(Debug, Default)]
    struct RecordingSink {
        stored: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl DocumentSink for RecordingSink {
        async fn store(&self, destination: &str, key: &str, _body: Bytes) -> anyhow::Result<()> {
            self.stored
                .lock()
                .unwrap()
                .push((destination.to_string(), key.to_string()));
            Ok(())
        }
    }

    fn store() -> ResultStore {
        let provider = MemoryCacheProvider::new(&MemoryStoreConfig::default());
        ResultStore::new(Arc::new(provider), Duration::from_secs(60))
    }

    fn envelope(request: &JobRequest) -> TaskEnvelope {
        TaskEnvelope::new(PROCESS_DOCUMENTS_TASK, serde_json::to_value(request).unwrap())
    }

    #[tokio::test]
    async fn test_documents_are_filtered_copied_and_tallied() {
        let sink = Arc::new(RecordingSink::default());
        let handler = ProcessDocumentsHandler::new(Arc::new(FakeSource::default()), sink.clone());
        let request = build_job(
            "US0000000001\nUS0000000002",
            date(2024, 1, 1),
            date(2024, 12, 31),
            &[DocumentKind::Slides, DocumentKind::Report],
            "bucket-x",
        )
        .unwrap();

        let store = store();
        let task = envelope(&request);
        let mut reporter = ProgressReporter::new(store.clone(), task.id);
        let value = handler.execute(&task, &mut reporter).await.unwrap().unwrap();

        assert_eq!(value["total"], 4);
        assert_eq!(value["succeeded"], 2);
        assert_eq!(value["failed"], 2);
        assert_eq!(
            store.read_snapshot(task.id).await.unwrap(),
            Some(StatusSnapshot::Complete {
                total: 4,
                succeeded: 2,
                failed: 2
            })
        );

        let stored = sink.stored.lock().unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(
            stored[0],
            (
                "bucket-x".to_string(),
                "US0000000001/slides/2024-03-01_q1.pdf".to_string()
            )
        );
    }

    #[tokio::test]
    async fn test_listing_failure_fails_the_job() {
        let source = FakeSource {
            broken_identifier: Some("BAD".to_string()),
        };
        let handler =
            ProcessDocumentsHandler::new(Arc::new(source), Arc::new(RecordingSink::default()));
        let request = build_job(
            "GOOD\nBAD",
            date(2024, 1, 1),
            date(2024, 12, 31),
            &[DocumentKind::Slides],
            "bucket-x",
        )
        .unwrap();

        let task = envelope(&request);
        let mut reporter = ProgressReporter::new(store(), task.id);
        let err = handler.execute(&task, &mut reporter).await.unwrap_err();

        assert!(matches!(err, JobExecutionError::Transient(_)));
        assert!(err.reason().contains("BAD"));
    }

    #[tokio::test]
    async fn test_malformed_payload_is_permanent() {
        let handler = ProcessDocumentsHandler::new(
            Arc::new(FakeSource::default()),
            Arc::new(RecordingSink::default()),
        );
        let task = TaskEnvelope::new(PROCESS_DOCUMENTS_TASK, json!({"isins": []}));
        let mut reporter = ProgressReporter::new(store(), TaskHandle::new());

        let err = handler.execute(&task, &mut reporter).await.unwrap_err();
        assert!(matches!(err, JobExecutionError::Permanent(_)));
    }
}
