//! Classified API errors.

use thiserror::Error;

/// Convenience alias for results returned by the API client.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Final, classified error surfaced by the API client.
///
/// Retryable conditions (timeouts, 5xx) are resolved inside the client;
/// callers only ever see the outcome of the last attempt.
#[derive(Debug, Error)]
#[allow(clippy::module_name_repetitions)]
pub enum ApiError {
    /// Request or response body exceeded the timeout.
    #[error("request timed out: {path}")]
    Timeout {
        /// Endpoint path.
        path: String,
    },

    /// Server answered with a 5xx status.
    #[error("server error (HTTP {status}): {path}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Endpoint path.
        path: String,
    },

    /// Server answered with a 4xx status.
    #[error("client error (HTTP {status}): {}", .message.as_deref().unwrap_or("no message"))]
    Client {
        /// HTTP status code.
        status: u16,
        /// Message from the server's `{"error": ...}` payload, if any.
        message: Option<String>,
    },

    /// Single-entity lookup returned 404.
    #[error("not found: {what}")]
    NotFound {
        /// Description of the missing entity.
        what: String,
    },

    /// Server answered with a status that is neither success nor error.
    #[error("unexpected HTTP status {status}: {path}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Endpoint path.
        path: String,
    },

    /// Connection-level failure other than a timeout.
    #[error("request failed: {path}")]
    Transport {
        /// Endpoint path.
        path: String,
        /// Underlying HTTP error.
        #[source]
        source: reqwest::Error,
    },

    /// Response body did not match any accepted shape.
    #[error("failed to decode JSON response: {path}")]
    Decode {
        /// Endpoint path.
        path: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Request could not be built.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Retry budget exhausted without a terminal outcome.
    #[error("maximum retries exceeded")]
    MaxRetriesExceeded,
}

impl ApiError {
    /// Classifies a transport-level `reqwest` error.
    pub(crate) fn from_transport(path: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout {
                path: String::from(path),
            }
        } else {
            Self::Transport {
                path: String::from(path),
                source,
            }
        }
    }

    /// Whether the retry executor may attempt the call again.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Server { .. })
    }

    /// Whether this is a timeout.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// HTTP status carried by the error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. }
            | Self::Client { status, .. }
            | Self::UnexpectedStatus { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            _ => None,
        }
    }

    /// Converts a 404 client error into `NotFound`; other errors pass through.
    #[must_use]
    pub fn into_not_found(self, what: impl Into<String>) -> Self {
        match self {
            Self::Client { status: 404, .. } => Self::NotFound { what: what.into() },
            other => other,
        }
    }

    /// User-facing message. Never exposes raw transport text.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Timeout { .. } => {
                String::from("Request timed out. Please check your connection and try again.")
            }
            Self::Server { .. } => String::from("Server error. Please try again in a moment."),
            Self::Client { message, .. } => message
                .clone()
                .unwrap_or_else(|| String::from("Invalid request. Please check your input.")),
            Self::NotFound { .. } => String::from(
                "The movie you're looking for doesn't exist or has been removed.",
            ),
            Self::Transport { .. } => String::from(
                "Could not reach the movie service. Please check if the backend is running.",
            ),
            Self::Decode { .. } | Self::UnexpectedStatus { .. } => {
                String::from("Received an unexpected response from the movie service.")
            }
            Self::InvalidRequest(_) => String::from("Invalid request. Please check your input."),
            Self::MaxRetriesExceeded => {
                String::from("Maximum retries exceeded. Please try again later.")
            }
        }
    }
}
