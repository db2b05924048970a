//! Remote storage client.
//!
//! Four blocking-from-the-caller's-view operations against an object store that
//! can share files publicly:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      ObjectStorage                               │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ store(path, name) -> ref     │ grant_public_read(id)            │
//! │ fetch_metadata(id) -> meta   │ delete(id) -> status             │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ GoogleDriveStorage (Drive v3) │ LocalFsStorage (OpenDAL fs)     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

mod config;
pub mod drive;
mod error;
mod local;
mod types;

use std::sync::Arc;

use tracing::info;

pub use config::{DriveCredentials, DriveEndpoints, StorageProvider};
pub use drive::GoogleDriveStorage;
pub use error::StorageError;
pub use local::LocalFsStorage;
pub use types::{ObjectMetadata, ObjectStorage, RemoteObjectRef};

/// Build the storage client for a provider.
///
/// # Errors
///
/// Returns an error if the client cannot be initialized.
pub fn connect(provider: StorageProvider) -> Result<Arc<dyn ObjectStorage>, StorageError> {
    let name = provider.name();
    let storage: Arc<dyn ObjectStorage> = match provider {
        StorageProvider::GoogleDrive {
            credentials,
            endpoints,
            timeout,
        } => Arc::new(GoogleDriveStorage::new(credentials, endpoints, timeout)?),
        StorageProvider::LocalFs {
            root,
            public_base_url,
        } => Arc::new(LocalFsStorage::new(&root, public_base_url)?),
    };

    info!(provider = name, "Storage client ready");
    Ok(storage)
}
