//! Upload intake error types.

use thiserror::Error;

/// Intake rejections. These never reach the orchestrator.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// File size exceeds maximum allowed.
    #[error("file size {size} bytes exceeds maximum allowed {max} bytes")]
    FileTooLarge {
        /// Bytes received so far.
        size: u64,
        /// Maximum allowed size.
        max: u64,
    },

    /// MIME type not allowed.
    #[error("Invalid file type: '{mime_type}'")]
    InvalidMimeType {
        /// The rejected MIME type.
        mime_type: String,
    },

    /// The request carried no `file` field.
    #[error("no file uploaded: expected multipart field '{field}'")]
    MissingFile {
        /// Expected field name.
        field: &'static str,
    },

    /// The request body could not be parsed.
    #[error("malformed request: {0}")]
    Malformed(String),
}

impl ValidationError {
    /// Create a file too large error.
    #[must_use]
    pub fn file_too_large(size: u64, max: u64) -> Self {
        Self::FileTooLarge { size, max }
    }

    /// Create an invalid MIME type error.
    #[must_use]
    pub fn invalid_mime_type(mime_type: impl Into<String>) -> Self {
        Self::InvalidMimeType {
            mime_type: mime_type.into(),
        }
    }

    /// Create a malformed request error.
    #[must_use]
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}
