//! Error types for marcfix.
//!
//! A single [`Error`] covers every failure mode of the pipeline, with
//! explicit variants so callers can decide their own retry policy.

use std::fmt;
use thiserror::Error;

use crate::types::RecordId;

/// The unified error type for marcfix operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or out-of-range record id, detected before any I/O.
    #[error("invalid record id '{0}'")]
    InvalidId(String),

    /// The record API has no record with this id.
    #[error("record {0} not found")]
    NotFound(RecordId),

    /// Network or API failure from the record client.
    #[error("client error: {0}")]
    Client(#[from] ClientError),

    /// Failure inside the validation rule engine.
    #[error("validator error: {0}")]
    Validator(#[from] ValidatorError),

    /// Bad time-window configuration.
    #[error("invalid time window: {0}")]
    Window(#[from] WindowError),

    /// Persistence failure in the backup store.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Other input validation errors (URL, batch id, record document).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

impl Error {
    /// Returns true for errors that come from the remote record API.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Client(_) | Error::NotFound(_))
    }
}

/// Record client failures.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Generic transport error.
    #[error("HTTP error: {message}")]
    Http { message: String },

    /// The API answered with a non-success status.
    #[error("{0}")]
    Api(ApiError),

    /// The API answered with a body we could not decode.
    #[error("unexpected response: {message}")]
    Decode { message: String },
}

/// A non-success response from the record API.
#[derive(Debug)]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Error message from the server.
    pub message: Option<String>,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: u16, message: Option<String>) -> Self {
        Self { status, message }
    }

    /// Check if the API rejected our credentials.
    pub fn is_auth_error(&self) -> bool {
        self.status == 401 || self.status == 403
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Rule engine failures.
#[derive(Debug, Error)]
pub enum ValidatorError {
    /// A single rule failed to run.
    #[error("rule '{rule}' failed: {message}")]
    Rule { rule: String, message: String },
}

/// Time-window configuration errors.
#[derive(Debug, Error)]
pub enum WindowError {
    /// The window string does not look like `HH-HH`.
    #[error("time window should be in format 'HH-HH', got '{value}'")]
    Malformed { value: String },

    /// One of the hours is outside 0..=23.
    #[error("invalid time interval '{value}': hours must be between 00 and 23")]
    InvalidRange { value: String },
}

/// Backup store failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be opened, locked, read or written.
    #[error("I/O error: {message}")]
    Io { message: String },

    /// A stored entry could not be encoded or decoded.
    #[error("corrupt entry: {message}")]
    Serialization { message: String },

    /// An entry for this id already exists in the batch.
    #[error("batch '{batch}' already contains record {id}")]
    DuplicateEntry { batch: String, id: RecordId },
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid API URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// Invalid batch id.
    #[error("invalid batch id '{value}': {reason}")]
    BatchId { value: String, reason: String },

    /// A record document is missing something we need.
    #[error("invalid record: {reason}")]
    Record { reason: String },

    /// Generic invalid input.
    #[error("{message}")]
    Other { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display() {
        let err = ApiError::new(503, Some("maintenance".to_string()));
        assert_eq!(err.to_string(), "HTTP 503: maintenance");
        assert!(!err.is_auth_error());
        assert!(ApiError::new(401, None).is_auth_error());
    }

    #[test]
    fn window_errors_name_the_value() {
        let err = Error::from(WindowError::InvalidRange {
            value: "99-14".to_string(),
        });
        assert!(err.to_string().contains("99-14"));
    }
}
