//! Error types for the issue tracker client.
//!
//! This module defines `TrackerError`, the unified error type returned by
//! every client operation. Transport failures, non-success HTTP statuses and
//! undecodable bodies are separate variants so callers never have to guess
//! whether a returned body is a real response or a failure message.
//!
//! # Security
//!
//! The credential (API token or password) must never appear in error
//! messages. Use `sanitize_message()` on any text that came from the server
//! or the transport before embedding it in an error or a log event.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Unified error type for all issue tracker operations.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Configuration error - missing or invalid settings.
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP client initialization failed.
    #[error("HTTP client error: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// The request never produced a response (connect, TLS, I/O failure).
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    /// Request timed out.
    #[error("request timed out after {duration:?} ({operation})")]
    Timeout {
        /// How long we waited before timing out.
        duration: Duration,
        /// The operation that timed out, e.g. `GET Projects`.
        operation: String,
    },

    /// The server answered with a non-success status code.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// The HTTP status code returned.
        status: reqwest::StatusCode,
        /// The raw response body, credential redacted.
        body: String,
    },

    /// The response body could not be read or decoded as text.
    #[error("failed to decode response body: {0}")]
    Decode(#[source] reqwest::Error),

    /// The base URL or an endpoint path did not form a valid API URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A local attachment could not be read.
    #[error("cannot read attachment {}: {source}", .path.display())]
    Attachment {
        /// Path of the file that failed to load.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Input validation failed before any request was sent.
    #[error("validation error: {0}")]
    Validation(String),

    /// Connection test failed.
    #[error("connection test failed: {message}")]
    ConnectionTest {
        /// Details about why the connection test failed.
        message: String,
    },
}

impl From<url::ParseError> for TrackerError {
    fn from(err: url::ParseError) -> Self {
        TrackerError::InvalidUrl(err.to_string())
    }
}

impl TrackerError {
    /// Creates a configuration error for a missing environment variable.
    pub fn missing_env(var_name: &str) -> Self {
        TrackerError::Config(format!(
            "missing required environment variable: {}",
            var_name
        ))
    }

    /// Creates a configuration error for an invalid value.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        TrackerError::Config(message.into())
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        TrackerError::Validation(message.into())
    }

    /// Creates a timeout error.
    pub fn timeout(duration: Duration, operation: impl Into<String>) -> Self {
        TrackerError::Timeout {
            duration,
            operation: operation.into(),
        }
    }

    /// Creates a connection test error.
    pub fn connection_test(message: impl Into<String>) -> Self {
        TrackerError::ConnectionTest {
            message: message.into(),
        }
    }

    /// Returns true if the request failed before a response was received.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, TrackerError::Http(_) | TrackerError::Timeout { .. })
    }

    /// Returns the HTTP status for errors carrying a server response.
    #[must_use]
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            TrackerError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the server rejected the credentials (HTTP 401/403).
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self.status(),
            Some(reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN)
        )
    }

    /// Replaces every occurrence of `secret` in `message` with `[REDACTED]`.
    #[must_use]
    pub fn sanitize_message(message: &str, secret: &str) -> String {
        if secret.is_empty() {
            return message.to_string();
        }
        message.replace(secret, "[REDACTED]")
    }

    /// Creates a sanitized version of this error's display message.
    #[must_use]
    pub fn sanitized_display(&self, secret: &str) -> String {
        Self::sanitize_message(&self.to_string(), secret)
    }
}
