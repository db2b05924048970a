//! Storage client contract and the values it exchanges.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::StorageError;

/// Reference to an object stored remotely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteObjectRef {
    /// Opaque provider id.
    pub id: String,
    /// Display name the object was stored under.
    pub display_name: String,
}

/// Metadata returned by [`ObjectStorage::fetch_metadata`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMetadata {
    /// Opaque provider id.
    pub id: String,
    /// Display name.
    pub display_name: String,
}

/// Remote object storage with public sharing.
///
/// Every call is a single attempt. Implementations never retry.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Upload the bytes at `local_path` under `display_name`, declared as `content_type`.
    ///
    /// The local file is left in place.
    async fn store(
        &self,
        local_path: &Path,
        display_name: &str,
        content_type: &str,
    ) -> Result<RemoteObjectRef, StorageError>;

    /// Make the object readable by anyone holding its link.
    async fn grant_public_read(&self, object_id: &str) -> Result<(), StorageError>;

    /// Fetch the display name of an object.
    async fn fetch_metadata(&self, object_id: &str) -> Result<ObjectMetadata, StorageError>;

    /// Remove an object, returning the provider's status code.
    async fn delete(&self, object_id: &str) -> Result<u16, StorageError>;

    /// Direct-access link for an object. Pure, no remote call.
    fn public_link(&self, object_id: &str) -> String;

    /// Provider name for logging.
    fn provider_name(&self) -> &'static str;
}

/// Reject ids that could escape a URL path segment or a storage root.
pub(crate) fn validate_object_id(object_id: &str) -> Result<(), StorageError> {
    let valid = !object_id.is_empty()
        && object_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(object_id.to_string()))
    }
}
