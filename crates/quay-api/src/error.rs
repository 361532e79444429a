//! Error types for API operations.

use thiserror::Error;

/// Errors that can occur while talking to a node's httpd.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport-level failure (DNS, connect, timeout).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The node answered with a non-success status.
    #[error("node responded with {status}: {message}")]
    Response {
        /// HTTP status code.
        status: u16,
        /// Error body returned by the node, if any.
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("could not parse node response: {0}")]
    Parse(String),
}

impl ApiError {
    /// Whether this error means the addressed resource does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Response { status: 404, .. })
    }
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
