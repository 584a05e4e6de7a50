//! Unified application error types for DocHarvest.
//!
//! Every crate maps its internal failures into [`AppError`] so that the
//! client, the worker pool, and the CLI share one error vocabulary.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Operator input was malformed; nothing was dispatched.
    Validation,
    /// The task queue backend could not accept a job.
    QueueUnavailable,
    /// A snapshot or task result could not be read from the result store.
    StoreRead,
    /// A write to the result store failed.
    StoreWrite,
    /// The referenced task handle is not tracked (never submitted or already disposed).
    NotFound,
    /// The operation conflicts with in-flight work (single-flight violation).
    Conflict,
    /// A configuration value is missing or invalid.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "VALIDATION"),
            Self::QueueUnavailable => write!(f, "QUEUE_UNAVAILABLE"),
            Self::StoreRead => write!(f, "STORE_READ"),
            Self::StoreWrite => write!(f, "STORE_WRITE"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout DocHarvest.
///
/// Backend-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a queue-unavailable error.
    pub fn queue_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::QueueUnavailable, message)
    }

    /// Create a store-read error.
    pub fn store_read(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StoreRead, message)
    }

    /// Create a store-write error.
    pub fn store_write(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StoreWrite, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Re-categorize the error while keeping the message.
    ///
    /// Used at component boundaries, e.g. a serialization failure during
    /// dispatch is reported to the caller as `QueueUnavailable`.
    pub fn into_kind(mut self, kind: ErrorKind) -> Self {
        self.kind = kind;
        self
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
