//! Shared fixtures for route tests.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, Response},
};
use courier_core::completion::{CompletionClient, CompletionError};
use courier_core::storage::{
    ObjectMetadata, ObjectStorage, RemoteObjectRef, StorageError, drive::direct_link,
};
use courier_core::upload::UploadPolicy;
use http_body_util::BodyExt;

use crate::AppState;

const BOUNDARY: &str = "courier-test-boundary";

/// Storage double that hands out a fixed id and records every call.
#[derive(Default)]
pub struct MockStorage {
    pub fail_store: bool,
    pub fail_grant: bool,
    calls: Mutex<Vec<&'static str>>,
    stored_sizes: Mutex<Vec<u64>>,
    stored_types: Mutex<Vec<String>>,
}

impl MockStorage {
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn stored_sizes(&self) -> Vec<u64> {
        self.stored_sizes.lock().unwrap().clone()
    }

    pub fn stored_types(&self) -> Vec<String> {
        self.stored_types.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ObjectStorage for MockStorage {
    async fn store(
        &self,
        local_path: &Path,
        display_name: &str,
        content_type: &str,
    ) -> Result<RemoteObjectRef, StorageError> {
        self.record("store");
        self.stored_types.lock().unwrap().push(content_type.to_string());
        let size = std::fs::metadata(local_path)?.len();
        self.stored_sizes.lock().unwrap().push(size);
        if self.fail_store {
            return Err(StorageError::remote(403, "quota exceeded"));
        }
        Ok(RemoteObjectRef {
            id: "abc123".to_string(),
            display_name: display_name.to_string(),
        })
    }

    async fn grant_public_read(&self, _object_id: &str) -> Result<(), StorageError> {
        self.record("grant");
        if self.fail_grant {
            return Err(StorageError::remote(500, "permission update failed"));
        }
        Ok(())
    }

    async fn fetch_metadata(&self, object_id: &str) -> Result<ObjectMetadata, StorageError> {
        self.record("metadata");
        Ok(ObjectMetadata {
            id: object_id.to_string(),
            display_name: "photo.png".to_string(),
        })
    }

    async fn delete(&self, object_id: &str) -> Result<u16, StorageError> {
        self.record("delete");
        if !object_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(StorageError::InvalidKey(object_id.to_string()));
        }
        if object_id == "missing" {
            return Err(StorageError::not_found(object_id));
        }
        Ok(204)
    }

    fn public_link(&self, object_id: &str) -> String {
        direct_link(object_id)
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Completion double answering "Hi there", or a rate limit error.
#[derive(Default)]
pub struct MockCompletion {
    pub fail: bool,
    prompts: Mutex<Vec<String>>,
}

impl MockCompletion {
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for MockCompletion {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail {
            return Err(CompletionError::Api {
                status: 429,
                message: "Rate limit reached".to_string(),
            });
        }
        Ok("Hi there".to_string())
    }
}

/// Mocks plus a private temporary upload directory.
pub struct TestContext {
    pub storage: Arc<MockStorage>,
    pub completion: Arc<MockCompletion>,
    policy: UploadPolicy,
    temp_dir: tempfile::TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_policy(UploadPolicy::new())
    }

    pub fn with_policy(policy: UploadPolicy) -> Self {
        Self {
            storage: Arc::new(MockStorage::default()),
            completion: Arc::new(MockCompletion::default()),
            policy,
            temp_dir: tempfile::tempdir().expect("temp dir"),
        }
    }

    pub fn with_storage_failure(mut self, fail_store: bool, fail_grant: bool) -> Self {
        self.storage = Arc::new(MockStorage {
            fail_store,
            fail_grant,
            ..MockStorage::default()
        });
        self
    }

    pub fn with_failing_completion(mut self) -> Self {
        self.completion = Arc::new(MockCompletion {
            fail: true,
            ..MockCompletion::default()
        });
        self
    }

    pub fn state(&self) -> AppState {
        AppState::new(
            self.storage.clone(),
            self.completion.clone(),
            self.policy.clone(),
            self.temp_dir.path(),
        )
    }

    pub fn temp_dir_is_empty(&self) -> bool {
        std::fs::read_dir(self.temp_dir.path())
            .expect("read temp dir")
            .next()
            .is_none()
    }
}

/// Build a `POST /upload` request with a single file part.
pub fn multipart_request(
    field: &str,
    filename: &str,
    content_type: &str,
    data: &[u8],
) -> Request<Body> {
    let mut body = Vec::with_capacity(data.len() + 256);
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::post("/upload")
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Collect a response body as JSON.
pub async fn read_json(response: Response<Body>) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
