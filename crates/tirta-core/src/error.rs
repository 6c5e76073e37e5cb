//! Error types for tirta-core.
//!
//! Every failure in this crate is recoverable by design: transport errors
//! surface to the caller as a banner message, persistence failures degrade
//! to an in-memory store, and malformed readings are coerced at the input
//! boundary before they can reach here. Nothing in this taxonomy is fatal
//! to the process.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur in the tirta pipeline.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error
/// variants in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// HTTP transport failure (connection refused, DNS, malformed body).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the response body, or the status line.
        message: String,
    },

    /// Invalid base URL for the API client.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A fetch cycle exceeded its deadline and was abandoned.
    #[error("Operation '{operation}' timed out after {duration:?}")]
    Timeout {
        /// The operation that timed out.
        operation: String,
        /// The timeout duration.
        duration: Duration,
    },

    /// I/O error (history file, config).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a timeout error with operation context.
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }
}

/// Result type alias using tirta-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;
