//! Storage error types.

use thiserror::Error;

/// Remote storage operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Object not found in storage.
    #[error("file not found: {id}")]
    NotFound {
        /// Object id that was not found.
        id: String,
    },

    /// Credentials were rejected by the provider.
    #[error("storage authentication failed: {0}")]
    Unauthorized(String),

    /// Provider answered with a non-success status.
    #[error("storage request failed ({status}): {message}")]
    Remote {
        /// HTTP status returned by the provider.
        status: u16,
        /// Provider error message.
        message: String,
    },

    /// Provider could not be reached.
    #[error("storage transport error: {0}")]
    Transport(String),

    /// Provider answered with a body we could not interpret.
    #[error("invalid storage response: {0}")]
    InvalidResponse(String),

    /// Storage provider configuration error.
    #[error("storage configuration error: {0}")]
    Configuration(String),

    /// Local file could not be read.
    #[error("failed to read local file: {0}")]
    LocalFile(String),

    /// OpenDAL operation error.
    #[error("storage operation failed: {0}")]
    Operation(String),

    /// Object id contains characters no provider accepts.
    #[error("invalid object id: {0}")]
    InvalidKey(String),
}

impl StorageError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create an operation error.
    #[must_use]
    pub fn operation(msg: impl Into<String>) -> Self {
        Self::Operation(msg.into())
    }

    /// Create a remote error.
    #[must_use]
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            status,
            message: message.into(),
        }
    }

    /// Whether this error means the object does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<opendal::Error> for StorageError {
    fn from(err: opendal::Error) -> Self {
        match err.kind() {
            opendal::ErrorKind::NotFound => Self::NotFound {
                id: err.to_string(),
            },
            opendal::ErrorKind::PermissionDenied => Self::Unauthorized(err.to_string()),
            _ => Self::Operation(err.to_string()),
        }
    }
}

impl From<reqwest::Error> for StorageError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::LocalFile(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = StorageError::not_found("abc123");
        assert_eq!(err.to_string(), "file not found: abc123");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_remote_display() {
        let err = StorageError::remote(403, "The user's Drive storage quota has been exceeded.");
        assert_eq!(
            err.to_string(),
            "storage request failed (403): The user's Drive storage quota has been exceeded."
        );
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_from_opendal_not_found() {
        let err: StorageError =
            opendal::Error::new(opendal::ErrorKind::NotFound, "missing").into();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: StorageError = io.into();
        assert!(matches!(err, StorageError::LocalFile(_)));
    }
}
