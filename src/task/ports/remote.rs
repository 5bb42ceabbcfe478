//! Transport-level error shared by the remote backend API ports.

use std::sync::Arc;
use thiserror::Error;

/// Result type for remote backend API operations.
pub type RemoteApiResult<T> = Result<T, RemoteApiError>;

/// Errors surfaced by remote backend API implementations.
///
/// Backend adapters never let these escape: every variant is re-wrapped
/// into the task-service connection error carrying the backend name and the
/// original message.
#[derive(Debug, Clone, Error)]
pub enum RemoteApiError {
    /// The request could not be sent or the response never arrived.
    #[error("transport failure: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),

    /// The remote API answered with a failure status.
    #[error("API request failed: {status} - {body}")]
    Status {
        /// HTTP status code of the response.
        status: u16,
        /// Response body, as text.
        body: String,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),

    /// The backend rejected the operation or is missing required state.
    #[error("{0}")]
    Backend(String),
}

impl RemoteApiError {
    /// Wraps a transport-layer error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }

    /// Builds a backend-state error from a message.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}
