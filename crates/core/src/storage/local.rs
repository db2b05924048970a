//! Local filesystem storage using Apache OpenDAL.
//!
//! Development backend. Each object is written under its id, with the display
//! name and sharing flag kept in a `{id}.meta.json` sidecar.

use std::path::Path;

use async_trait::async_trait;
use opendal::{ErrorKind, Operator, services};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use super::error::StorageError;
use super::types::{ObjectMetadata, ObjectStorage, RemoteObjectRef, validate_object_id};

/// Status reported for a successful delete, matching Drive's `204 No Content`.
const DELETED_STATUS: u16 = 204;

#[derive(Debug, Serialize, Deserialize)]
struct Sidecar {
    name: String,
    #[serde(default)]
    content_type: Option<String>,
    #[serde(default)]
    public: bool,
}

/// Filesystem backed [`ObjectStorage`].
pub struct LocalFsStorage {
    operator: Operator,
    public_base_url: String,
}

impl LocalFsStorage {
    /// Create a local storage rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the root path is not valid UTF-8 or the operator
    /// cannot be built.
    pub fn new(root: &Path, public_base_url: impl Into<String>) -> Result<Self, StorageError> {
        let root = root
            .to_str()
            .ok_or_else(|| StorageError::configuration("invalid path"))?;
        let builder = services::Fs::default().root(root);

        let operator = Operator::new(builder)
            .map_err(|e| StorageError::configuration(e.to_string()))?
            .finish();

        Ok(Self {
            operator,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn sidecar_key(object_id: &str) -> String {
        format!("{object_id}.meta.json")
    }

    async fn read_sidecar(&self, object_id: &str) -> Result<Sidecar, StorageError> {
        let buffer = self
            .operator
            .read(&Self::sidecar_key(object_id))
            .await
            .map_err(|e| not_found_as(object_id, e))?;

        serde_json::from_slice(&buffer.to_vec())
            .map_err(|e| StorageError::InvalidResponse(e.to_string()))
    }

    async fn write_sidecar(&self, object_id: &str, sidecar: &Sidecar) -> Result<(), StorageError> {
        let bytes =
            serde_json::to_vec(sidecar).map_err(|e| StorageError::operation(e.to_string()))?;
        self.operator
            .write(&Self::sidecar_key(object_id), bytes)
            .await?;
        Ok(())
    }

    async fn ensure_exists(&self, object_id: &str) -> Result<(), StorageError> {
        self.operator
            .stat(object_id)
            .await
            .map(|_| ())
            .map_err(|e| not_found_as(object_id, e))
    }
}

/// Report a missing key with the object id instead of OpenDAL's message.
fn not_found_as(object_id: &str, err: opendal::Error) -> StorageError {
    if err.kind() == ErrorKind::NotFound {
        StorageError::not_found(object_id)
    } else {
        StorageError::from(err)
    }
}

#[async_trait]
impl ObjectStorage for LocalFsStorage {
    async fn store(
        &self,
        local_path: &Path,
        display_name: &str,
        content_type: &str,
    ) -> Result<RemoteObjectRef, StorageError> {
        let data = tokio::fs::read(local_path).await?;
        let id = Uuid::new_v4().simple().to_string();
        let size = data.len();

        self.operator.write(&id, data).await?;
        self.write_sidecar(
            &id,
            &Sidecar {
                name: display_name.to_string(),
                content_type: Some(content_type.to_string()),
                public: false,
            },
        )
        .await?;

        info!(object_id = %id, size, "Stored file in local storage");
        Ok(RemoteObjectRef {
            id,
            display_name: display_name.to_string(),
        })
    }

    async fn grant_public_read(&self, object_id: &str) -> Result<(), StorageError> {
        validate_object_id(object_id)?;
        self.ensure_exists(object_id).await?;

        let mut sidecar = self.read_sidecar(object_id).await?;
        if !sidecar.public {
            sidecar.public = true;
            self.write_sidecar(object_id, &sidecar).await?;
        }
        debug!(object_id, "Granted public read");
        Ok(())
    }

    async fn fetch_metadata(&self, object_id: &str) -> Result<ObjectMetadata, StorageError> {
        validate_object_id(object_id)?;
        self.ensure_exists(object_id).await?;

        let sidecar = self.read_sidecar(object_id).await?;
        Ok(ObjectMetadata {
            id: object_id.to_string(),
            display_name: sidecar.name,
        })
    }

    async fn delete(&self, object_id: &str) -> Result<u16, StorageError> {
        validate_object_id(object_id)?;
        // OpenDAL deletes are idempotent, so existence is checked first
        self.ensure_exists(object_id).await?;

        self.operator.delete(object_id).await?;
        self.operator.delete(&Self::sidecar_key(object_id)).await?;

        info!(object_id, "Deleted file from local storage");
        Ok(DELETED_STATUS)
    }

    fn public_link(&self, object_id: &str) -> String {
        format!("{}/{object_id}", self.public_base_url)
    }

    fn provider_name(&self) -> &'static str {
        "local"
    }
}
