//! Multipart intake: spools the `file` field to a temporary file.

use std::path::Path;

use axum::extract::Multipart;
use courier_core::upload::{UploadPolicy, UploadedFile, ValidationError};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::ApiError;

/// Multipart field carrying the upload.
pub const FILE_FIELD: &str = "file";

/// Read the `file` field of a multipart body into a temporary file under `temp_dir`.
///
/// The declared media type is checked before any byte is written and the size
/// limit is enforced while streaming. On any error the partial temporary file
/// is removed.
///
/// # Errors
///
/// Returns a validation error for a missing field, a disallowed type, an
/// oversized payload or a malformed body, and an internal error if the
/// temporary file cannot be written.
pub async fn receive_file(
    mut multipart: Multipart,
    policy: &UploadPolicy,
    temp_dir: &Path,
) -> Result<UploadedFile, ApiError> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| ValidationError::malformed(e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let original_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        policy.validate_content_type(&content_type)?;

        let (file, temp_path) = tempfile::Builder::new()
            .prefix("upload-")
            .tempfile_in(temp_dir)?
            .into_parts();
        let mut file = tokio::fs::File::from_std(file);
        let mut size: u64 = 0;

        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| ValidationError::malformed(e.body_text()))?
        {
            size += chunk.len() as u64;
            policy.validate_size(size)?;
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        debug!(
            filename = %original_name,
            content_type = %content_type,
            size,
            path = %temp_path.display(),
            "Spooled upload to temporary file"
        );
        return Ok(UploadedFile::new(temp_path, original_name, content_type, size));
    }

    Err(ValidationError::MissingFile { field: FILE_FIELD }.into())
}
