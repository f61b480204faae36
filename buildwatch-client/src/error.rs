//! Error types for the buildwatch client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Message used when a failed poll response carries no usable `detail`
pub const FALLBACK_POLL_ERROR: &str = "Network error";

/// Errors that can occur when using the buildwatch client
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// The build events endpoint answered a poll with an error status
    ///
    /// Displays as the bare message so it can be shown to users verbatim.
    #[error("{message}")]
    PollFailed {
        /// HTTP status code
        status: u16,
        /// `detail` from the error body, or [`FALLBACK_POLL_ERROR`]
        message: String,
    },

    /// The session's cancellation token was triggered
    #[error("Build polling was cancelled")]
    Cancelled,

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Invalid request or configuration
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Create a poll failure from status code and message
    pub fn poll_failed(status: u16, message: impl Into<String>) -> Self {
        Self::PollFailed {
            status,
            message: message.into(),
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } | Self::PollFailed { status, .. } => Some(*status),
            Self::RequestFailed(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self.status(), Some(status) if (400..500).contains(&status))
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self.status(), Some(status) if status >= 500)
    }

    /// Check if this error comes from cancellation rather than the server
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
