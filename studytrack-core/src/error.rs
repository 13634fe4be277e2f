//! Error types for studytrack-core

use thiserror::Error;

/// Main error type for the studytrack-core library
#[derive(Error, Debug)]
pub enum Error {
    /// A session date that is not a valid `DD-MM-YYYY` calendar date
    #[error("malformed date {input:?}: {reason}")]
    MalformedDate { input: String, reason: String },

    /// A new or edited entry failed validation
    #[error("validation error: {0}")]
    Validation(String),

    /// Subject name already used by another subject
    #[error("a subject named {0:?} already exists")]
    DuplicateSubject(String),

    /// Session not found
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Logging setup error
    #[error("logging error: {0}")]
    Logging(String),
}

impl Error {
    pub(crate) fn malformed(input: &str, reason: impl Into<String>) -> Self {
        Error::MalformedDate {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for studytrack-core
pub type Result<T> = std::result::Result<T, Error>;
