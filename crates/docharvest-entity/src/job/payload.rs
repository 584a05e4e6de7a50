//! Well-known task names and payloads.

/// Task name of the queue round-trip probe.
pub const PING_TASK: &str = "ping";

/// Value a healthy worker returns for [`PING_TASK`].
pub const PING_RESPONSE: &str = "pong";

/// Task name of the batch document job; its payload is a serialized
/// [`JobRequest`](super::request::JobRequest).
pub const PROCESS_DOCUMENTS_TASK: &str = "process_documents";
