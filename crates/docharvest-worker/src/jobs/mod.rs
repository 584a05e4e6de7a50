//! Built-in job handler implementations.

pub mod documents;
pub mod ping;

pub use documents::{DocumentRef, DocumentSink, DocumentSource, ProcessDocumentsHandler};
pub use ping::PingJobHandler;
