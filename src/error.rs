//! Error types returned by the NSG manager.
//!
//! Two layers of errors exist:
//! - [`ProviderError`] - what the network provider reported (not found, or anything else)
//! - [`Error`] - the structured `{code, errors}` value handed back to callers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type alias for NSG manager operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Substring the provider puts in errors when two writers race on one resource.
pub const CONCURRENT_REQUEST_ERROR: &str =
    "The request failed due to conflict with a concurrent request";

/// Error codes surfaced to callers.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    UnableToCreate,
    UnableToUpdate,
    UnableToFind,
    InvalidRequest,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::UnableToCreate => "UNABLE_TO_CREATE",
            ErrorCode::UnableToUpdate => "UNABLE_TO_UPDATE",
            ErrorCode::UnableToFind => "UNABLE_TO_FIND",
            ErrorCode::InvalidRequest => "INVALID_REQUEST",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured error returned by every fallible NSG operation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {}", .errors.join(" "))]
pub struct Error {
    /// Broad failure category.
    pub code: ErrorCode,
    /// Human readable messages, most general first.
    pub errors: Vec<String>,
}

impl Error {
    pub fn new(code: ErrorCode, errors: Vec<String>) -> Self {
        Error { code, errors }
    }

    pub fn unable_to_create(message: impl Into<String>) -> Self {
        Error::new(ErrorCode::UnableToCreate, vec![message.into()])
    }

    pub fn unable_to_update(message: impl Into<String>) -> Self {
        Error::new(ErrorCode::UnableToUpdate, vec![message.into()])
    }

    pub fn unable_to_find(message: impl Into<String>) -> Self {
        Error::new(ErrorCode::UnableToFind, vec![message.into()])
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Error::new(ErrorCode::InvalidRequest, vec![message.into()])
    }
}

/// Failure reported by the network provider, classified at the client boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// The addressed resource does not exist.
    #[error("resource not found: {0}")]
    NotFound(String),
    /// Any other provider or transport failure.
    #[error("{0}")]
    Cloud(String),
}

impl ProviderError {
    /// True when the provider rejected the write because another request was
    /// modifying the same resource.
    pub fn is_concurrent_request(&self) -> bool {
        is_concurrent_request_error(&self.to_string())
    }
}

/// Check a provider error message for the concurrent-modification marker.
pub fn is_concurrent_request_error(err: &str) -> bool {
    err.contains(CONCURRENT_REQUEST_ERROR)
}
