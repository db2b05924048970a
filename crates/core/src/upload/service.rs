//! Upload orchestrator implementation.

use std::io;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::types::{PublishedFile, UploadedFile};
use crate::storage::{ObjectStorage, StorageError};

/// Sequences store → public grant → link for one received file, and removes
/// the temporary file on every exit path.
pub struct UploadOrchestrator {
    storage: Arc<dyn ObjectStorage>,
}

impl UploadOrchestrator {
    /// Create a new orchestrator.
    #[must_use]
    pub fn new(storage: Arc<dyn ObjectStorage>) -> Self {
        Self { storage }
    }

    /// Publish a received file and return its public link.
    ///
    /// The steps run strictly in order. A failed store skips the grant. A
    /// failed grant leaves the stored object in place, unshared: no rollback is
    /// attempted. The temporary file is removed before this returns, whatever
    /// the outcome; removal failures are logged only.
    ///
    /// # Errors
    ///
    /// Returns the error of the store or grant step that failed.
    pub async fn publish(&self, file: UploadedFile) -> Result<PublishedFile, StorageError> {
        let result = self.store_and_share(&file).await;
        remove_temp_file(file);
        result
    }

    async fn store_and_share(&self, file: &UploadedFile) -> Result<PublishedFile, StorageError> {
        let provider = self.storage.provider_name();

        let stored = self
            .storage
            .store(file.path(), file.original_name(), file.content_type())
            .await
            .inspect_err(|e| {
                error!(
                    provider,
                    filename = %file.original_name(),
                    error = %e,
                    "Failed to store upload"
                );
            })?;

        if let Err(e) = self.storage.grant_public_read(&stored.id).await {
            warn!(
                provider,
                object_id = %stored.id,
                error = %e,
                "Public read grant failed, stored object left orphaned"
            );
            return Err(e);
        }

        let direct_link = self.storage.public_link(&stored.id);

        // Display name only; the link does not depend on it
        let display_name = match self.storage.fetch_metadata(&stored.id).await {
            Ok(meta) => Some(meta.display_name),
            Err(e) => {
                warn!(object_id = %stored.id, error = %e, "Metadata fetch failed");
                None
            }
        };

        info!(
            provider,
            object_id = %stored.id,
            size = file.size(),
            content_type = %file.content_type(),
            "Upload published"
        );

        Ok(PublishedFile {
            object_id: stored.id,
            direct_link,
            display_name,
        })
    }
}

fn remove_temp_file(file: UploadedFile) {
    let path = file.path().to_path_buf();
    match file.discard() {
        Ok(()) => debug!(path = %path.display(), "Removed temporary upload"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "Temporary upload already removed");
        }
        Err(e) => error!(path = %path.display(), error = %e, "Error deleting temporary file"),
    }
}
