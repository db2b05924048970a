//! Upload types and intake constraints.

use std::io;
use std::path::Path;

use courier_shared::UploadConfig;
use serde::Serialize;
use tempfile::TempPath;

use super::error::ValidationError;

/// A received multipart payload, spooled to a temporary file.
///
/// The temporary file is removed when the value is dropped unless it was
/// already removed through [`UploadedFile::discard`].
#[derive(Debug)]
pub struct UploadedFile {
    temp_path: TempPath,
    original_name: String,
    content_type: String,
    size: u64,
}

impl UploadedFile {
    /// Wrap a spooled temporary file.
    #[must_use]
    pub fn new(
        temp_path: TempPath,
        original_name: impl Into<String>,
        content_type: impl Into<String>,
        size: u64,
    ) -> Self {
        Self {
            temp_path,
            original_name: original_name.into(),
            content_type: content_type.into(),
            size,
        }
    }

    /// Local temporary path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.temp_path
    }

    /// Filename as sent by the client.
    #[must_use]
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    /// Declared media type.
    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Remove the temporary file now. Consumes the upload so removal happens once.
    ///
    /// # Errors
    ///
    /// Returns the I/O error from unlinking, including `NotFound` when the file
    /// is already gone.
    pub fn discard(self) -> io::Result<()> {
        self.temp_path.close()
    }
}

/// Result of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishedFile {
    /// Remote object id.
    pub object_id: String,
    /// Public direct-access link.
    pub direct_link: String,
    /// Display name, when the metadata fetch succeeded.
    pub display_name: Option<String>,
}

/// Intake constraints applied before a file reaches the orchestrator.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    /// Maximum file size in bytes.
    pub max_file_size: u64,
    /// Allowed MIME types for upload.
    pub allowed_mime_types: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadPolicy {
    /// Default max file size: 5 MiB.
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

    /// Create a policy with default limits.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
            allowed_mime_types: Self::default_mime_types(),
        }
    }

    /// Create a policy from application configuration.
    #[must_use]
    pub fn from_config(config: &UploadConfig) -> Self {
        Self {
            max_file_size: config.max_file_size,
            allowed_mime_types: config.allowed_mime_types.clone(),
        }
    }

    /// Set maximum file size.
    #[must_use]
    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Set allowed MIME types.
    #[must_use]
    pub fn with_allowed_mime_types(mut self, types: Vec<String>) -> Self {
        self.allowed_mime_types = types;
        self
    }

    /// Default allowed MIME types: JPEG, PNG and PDF.
    #[must_use]
    pub fn default_mime_types() -> Vec<String> {
        vec![
            "image/jpeg".to_string(),
            "image/png".to_string(),
            "application/pdf".to_string(),
        ]
    }

    /// Check if a MIME type is allowed. Parameters such as `charset` are ignored.
    #[must_use]
    pub fn is_mime_type_allowed(&self, mime_type: &str) -> bool {
        let essence = mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        self.allowed_mime_types.iter().any(|t| *t == essence)
    }

    /// Validate the declared media type.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidMimeType`] if the type is not allowed.
    pub fn validate_content_type(&self, mime_type: &str) -> Result<(), ValidationError> {
        if self.is_mime_type_allowed(mime_type) {
            Ok(())
        } else {
            Err(ValidationError::invalid_mime_type(mime_type))
        }
    }

    /// Validate a (possibly partial) byte count.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::FileTooLarge`] once `size` exceeds the limit.
    pub fn validate_size(&self, size: u64) -> Result<(), ValidationError> {
        if size > self.max_file_size {
            Err(ValidationError::file_too_large(size, self.max_file_size))
        } else {
            Ok(())
        }
    }
}
