//! Repository error types.
//!
//! This module defines the unified error type returned by every collaborator,
//! covering HTTP transport failures, non-success API responses and local
//! file persistence errors.

use serde_json::{json, Value};
use thiserror::Error;

/// Unified errors from collaborator operations.
///
/// `Response` keeps the full response body so callers can write it to the
/// error log for manual remediation.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    /// The configured base URL or a derived endpoint is not a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The request could not be sent or the connection failed.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The API answered with a non-success status.
    #[error("{method} {url} failed with status {status}")]
    Response {
        method: String,
        url: String,
        status: u16,
        body: Value,
    },

    /// The response body did not have the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Failed to serialize data for persistence.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Local file operation failed.
    #[error("IO error: {0}")]
    Io(String),
}

impl RepositoryError {
    /// Create an invalid URL error.
    pub fn invalid_url(msg: impl Into<String>) -> Self {
        Self::InvalidUrl(msg.into())
    }

    /// Create a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create an IO error.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// HTTP status of a failed response, if the failure was a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Response { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Full failure payload, suitable for the error log.
    pub fn detail(&self) -> Value {
        match self {
            Self::Response {
                method,
                url,
                status,
                body,
            } => json!({
                "method": method,
                "url": url,
                "status": status,
                "body": body,
            }),
            other => json!({ "error": other.to_string() }),
        }
    }
}

impl From<reqwest::Error> for RepositoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<std::io::Error> for RepositoryError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
