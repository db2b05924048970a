//! Completion error types.

use thiserror::Error;

/// Language-model call errors.
///
/// The client does not classify remote failures further: rate limits,
/// malformed prompts and auth failures all arrive as [`CompletionError::Api`].
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Service answered with a non-success status.
    #[error("completion request failed ({status}): {message}")]
    Api {
        /// HTTP status returned by the service.
        status: u16,
        /// Service error message.
        message: String,
    },

    /// Service could not be reached.
    #[error("completion transport error: {0}")]
    Transport(String),

    /// Response body could not be decoded.
    #[error("invalid completion response: {0}")]
    InvalidResponse(String),

    /// Response carried no message content.
    #[error("completion response contained no content")]
    EmptyResponse,

    /// Client configuration error.
    #[error("completion configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for CompletionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}
