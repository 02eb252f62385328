//! Error types for ragcheck.
//!
//! Uses `thiserror` for every failure a check can report. Each variant maps to
//! one [`ErrorKind`] so callers can branch on the class of failure instead of
//! on message text.

use std::fmt;

/// Broad class of a check failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required setting is missing or the check configuration is invalid.
    Configuration,
    /// The target could not be reached (refused, DNS, timeout).
    Connectivity,
    /// The server answered with an unexpected HTTP status.
    Protocol,
    /// The server answered 200 but the payload is empty or unusable.
    Semantic,
    /// Anything else, reported with its message.
    Unexpected,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Configuration => write!(f, "configuration"),
            ErrorKind::Connectivity => write!(f, "connectivity"),
            ErrorKind::Protocol => write!(f, "protocol"),
            ErrorKind::Semantic => write!(f, "semantic"),
            ErrorKind::Unexpected => write!(f, "unexpected"),
        }
    }
}

/// Failure reported by a single check stage.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CheckError {
    #[error("Missing required environment variables: {}", .missing.join(", "))]
    MissingSettings { missing: Vec<String> },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Could not connect to {url}: {message}")]
    Unreachable { url: String, message: String },

    #[error("{url} returned status {status}")]
    UnexpectedStatus {
        url: String,
        status: u16,
        body: String,
    },

    #[error("No collections found in the vector database")]
    NoCollections,

    #[error("Query succeeded but no content was found in the database")]
    NoSourceChunks { query: String, response: String },

    #[error("Content processing failed: {message}")]
    Ingestion { message: String },

    #[error("Unexpected error: {message}")]
    Unexpected { message: String },
}

impl CheckError {
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::Unexpected {
            message: msg.into(),
        }
    }

    pub fn ingestion(msg: impl Into<String>) -> Self {
        Self::Ingestion {
            message: msg.into(),
        }
    }

    /// Classify this error into the failure taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CheckError::MissingSettings { .. } | CheckError::InvalidConfig { .. } => {
                ErrorKind::Configuration
            }
            CheckError::Unreachable { .. } => ErrorKind::Connectivity,
            CheckError::UnexpectedStatus { .. } => ErrorKind::Protocol,
            CheckError::NoCollections
            | CheckError::NoSourceChunks { .. }
            | CheckError::Ingestion { .. } => ErrorKind::Semantic,
            CheckError::Unexpected { .. } => ErrorKind::Unexpected,
        }
    }
}

/// Errors raised while talking HTTP to a target.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    #[error("connection failed: {message}")]
    Connect { message: String },

    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("request failed: {message}")]
    Request { message: String },
}

/// Errors raised while assembling a check pipeline.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    #[error("Stage '{stage}' depends on '{dependency}', which is not scheduled before it")]
    UnmetDependency { stage: String, dependency: String },

    #[error("Stage '{stage}' appears more than once")]
    DuplicateStage { stage: String },

    #[error("Pipeline has no stages")]
    Empty,
}

pub type Result<T, E = CheckError> = std::result::Result<T, E>;
