//! Error types for conversion, remote services and the end-to-end pipelines

use std::io;
use std::path::PathBuf;

/// Errors that can occur while parsing or producing a document format
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormatError {
    /// Error while reading a document
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Error while producing a document
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// Operation not available in this build or for this input
    #[error("Operation not supported: {0}")]
    NotSupported(String),
}

/// Failures talking to a remote collaborator (document service, renderer, reader).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ServiceError {
    /// The service could not be reached at all (DNS, connect, timeout).
    #[error("Cannot reach {service}: {reason}. Check your network.")]
    Unreachable { service: String, reason: String },
    /// The service answered with a non-success status.
    #[error("{service} returned HTTP {status}: {message}")]
    Status {
        service: String,
        status: u16,
        message: String,
    },
    /// The service answered but the payload was not what we expected.
    #[error("Unexpected response from {service}: {reason}")]
    BadResponse { service: String, reason: String },
    /// Credentials or other one-time setup are missing.
    #[error("{0}")]
    SetupRequired(String),
}

impl ServiceError {
    pub fn unreachable(service: impl Into<String>, reason: impl ToString) -> Self {
        ServiceError::Unreachable {
            service: service.into(),
            reason: reason.to_string(),
        }
    }

    pub fn bad_response(service: impl Into<String>, reason: impl ToString) -> Self {
        ServiceError::BadResponse {
            service: service.into(),
            reason: reason.to_string(),
        }
    }
}

/// Fatal failures of a push, pull, ingest or diagram run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
    /// Update mode was requested but no usable source path is on record.
    #[error("No source file found for document {doc_id} in history")]
    NoHistorySource { doc_id: String },
    /// The recorded source path points into a directory that no longer exists.
    #[error("Source directory not found: {}", .dir.display())]
    SourceDirMissing { dir: PathBuf, recorded: String },
    /// Bad user input (unknown source type, missing file, bad identifier).
    #[error("{0}")]
    InvalidInput(String),
}

impl PipelineError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        PipelineError::Io {
            context: context.into(),
            source,
        }
    }

    /// True for errors caused by local state being out of sync with the remote
    /// document (history entries pointing nowhere).
    pub fn is_state_inconsistency(&self) -> bool {
        matches!(
            self,
            PipelineError::NoHistorySource { .. } | PipelineError::SourceDirMissing { .. }
        )
    }
}

/// Result of an operation that can partially succeed.
///
/// Fatal failures travel as `Err`; anything that still produced a usable value
/// is either [`Outcome::Complete`] or [`Outcome::Degraded`] with the warnings
/// collected along the way.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Complete(T),
    Degraded { value: T, warnings: Vec<String> },
}

impl<T> Outcome<T> {
    /// Build an outcome from a value and whatever warnings were collected.
    pub fn from_parts(value: T, warnings: Vec<String>) -> Self {
        if warnings.is_empty() {
            Outcome::Complete(value)
        } else {
            Outcome::Degraded { value, warnings }
        }
    }

    pub fn degraded(value: T, warning: impl Into<String>) -> Self {
        Outcome::Degraded {
            value,
            warnings: vec![warning.into()],
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Outcome::Complete(_))
    }

    pub fn value(&self) -> &T {
        match self {
            Outcome::Complete(value) | Outcome::Degraded { value, .. } => value,
        }
    }

    pub fn warnings(&self) -> &[String] {
        match self {
            Outcome::Complete(_) => &[],
            Outcome::Degraded { warnings, .. } => warnings,
        }
    }

    pub fn into_parts(self) -> (T, Vec<String>) {
        match self {
            Outcome::Complete(value) => (value, Vec::new()),
            Outcome::Degraded { value, warnings } => (value, warnings),
        }
    }

    pub fn into_value(self) -> T {
        self.into_parts().0
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        let (value, warnings) = self.into_parts();
        Outcome::from_parts(f(value), warnings)
    }
}
