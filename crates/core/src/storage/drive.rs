//! Google Drive v3 storage client.
//!
//! Talks to the Drive REST API directly with `reqwest`: OAuth2 refresh-token
//! grant, multipart media upload, `anyone/reader` permission grant, metadata
//! lookup and delete.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use bytes::{BufMut, Bytes, BytesMut};
use reqwest::{Client, Response, StatusCode, header::CONTENT_TYPE};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use super::config::{DriveCredentials, DriveEndpoints};
use super::error::StorageError;
use super::types::{ObjectMetadata, ObjectStorage, RemoteObjectRef, validate_object_id};

/// Prefix of every Drive direct-download link.
pub const DIRECT_LINK_BASE: &str = "https://drive.google.com/uc?id=";

/// Access tokens are refreshed this long before Google says they expire.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Upper bound on how long a cached access token is trusted.
const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

/// Direct-access link for a Drive file id.
#[must_use]
pub fn direct_link(object_id: &str) -> String {
    format!("{DIRECT_LINK_BASE}{object_id}")
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug, Deserialize)]
struct OAuthErrorBody {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    error: GoogleErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorDetail {
    message: String,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
    #[serde(default)]
    name: Option<String>,
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Google Drive backed [`ObjectStorage`].
pub struct GoogleDriveStorage {
    http: Client,
    credentials: DriveCredentials,
    endpoints: DriveEndpoints,
    token: Mutex<Option<CachedToken>>,
}

impl GoogleDriveStorage {
    /// Create a Drive client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        credentials: DriveCredentials,
        endpoints: DriveEndpoints,
        timeout: Duration,
    ) -> Result<Self, StorageError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StorageError::configuration(e.to_string()))?;

        Ok(Self {
            http,
            credentials,
            endpoints,
            token: Mutex::new(None),
        })
    }

    fn file_url(&self, object_id: &str) -> String {
        format!("{}/drive/v3/files/{object_id}", self.endpoints.api_base)
    }

    /// Return a cached access token, exchanging the refresh token when needed.
    async fn access_token(&self) -> Result<String, StorageError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| t.expires_at > Instant::now()) {
            return Ok(token.value.clone());
        }

        debug!("Refreshing Google access token");
        let response = self
            .http
            .post(&self.endpoints.token_url)
            .form(&[
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("refresh_token", self.credentials.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<OAuthErrorBody>(&body).map_or_else(
                |_| format!("token endpoint returned {status}"),
                |e| e.error_description.unwrap_or(e.error),
            );
            // 400/401 carry invalid_grant and friends
            return Err(match status {
                StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
                    StorageError::Unauthorized(message)
                }
                _ => StorageError::remote(status.as_u16(), message),
            });
        }

        let token: TokenResponse = response.json().await?;
        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + token_lifetime(token.expires_in),
        });

        Ok(token.access_token)
    }
}

#[async_trait]
impl ObjectStorage for GoogleDriveStorage {
    async fn store(
        &self,
        local_path: &Path,
        display_name: &str,
        content_type: &str,
    ) -> Result<RemoteObjectRef, StorageError> {
        let media = tokio::fs::read(local_path).await?;
        let boundary = format!("courier-{}", Uuid::new_v4().simple());
        let body = multipart_related(&boundary, display_name, content_type, &media)?;

        let token = self.access_token().await?;
        let response = self
            .http
            .post(format!("{}/upload/drive/v3/files", self.endpoints.upload_base))
            .query(&[("uploadType", "multipart"), ("fields", "id,name")])
            .bearer_auth(token)
            .header(
                CONTENT_TYPE,
                format!("multipart/related; boundary={boundary}"),
            )
            .body(body)
            .send()
            .await?;

        let file: DriveFile = check_status(response, None).await?.json().await?;
        info!(
            object_id = %file.id,
            size = media.len(),
            "Stored file in Google Drive"
        );

        Ok(RemoteObjectRef {
            id: file.id,
            display_name: file.name.unwrap_or_else(|| display_name.to_string()),
        })
    }

    async fn grant_public_read(&self, object_id: &str) -> Result<(), StorageError> {
        validate_object_id(object_id)?;
        let token = self.access_token().await?;

        let response = self
            .http
            .post(format!("{}/permissions", self.file_url(object_id)))
            .bearer_auth(token)
            .json(&json!({ "role": "reader", "type": "anyone" }))
            .send()
            .await?;

        check_status(response, Some(object_id)).await?;
        debug!(object_id, "Granted public read");
        Ok(())
    }

    async fn fetch_metadata(&self, object_id: &str) -> Result<ObjectMetadata, StorageError> {
        validate_object_id(object_id)?;
        let token = self.access_token().await?;

        let response = self
            .http
            .get(self.file_url(object_id))
            .query(&[("fields", "id,name")])
            .bearer_auth(token)
            .send()
            .await?;

        let file: DriveFile = check_status(response, Some(object_id)).await?.json().await?;
        Ok(ObjectMetadata {
            id: file.id,
            display_name: file.name.unwrap_or_default(),
        })
    }

    async fn delete(&self, object_id: &str) -> Result<u16, StorageError> {
        validate_object_id(object_id)?;
        let token = self.access_token().await?;

        let response = self
            .http
            .delete(self.file_url(object_id))
            .bearer_auth(token)
            .send()
            .await?;

        let status = check_status(response, Some(object_id)).await?.status();
        info!(object_id, status = status.as_u16(), "Deleted file from Google Drive");
        Ok(status.as_u16())
    }

    fn public_link(&self, object_id: &str) -> String {
        direct_link(object_id)
    }

    fn provider_name(&self) -> &'static str {
        "google_drive"
    }
}

/// How long a token granted for `expires_in` seconds stays in the cache.
fn token_lifetime(expires_in: u64) -> Duration {
    Duration::from_secs(expires_in)
        .min(MAX_TOKEN_LIFETIME)
        .saturating_sub(TOKEN_EXPIRY_MARGIN)
}

/// Map a non-success Drive response onto a [`StorageError`].
///
/// Only 401 means the credentials are bad. Drive answers 403 for quota, rate
/// limits and missing permissions alike, so it stays a `Remote` error.
async fn check_status(
    response: Response,
    object_id: Option<&str>,
) -> Result<Response, StorageError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<GoogleErrorBody>(&body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| {
            if body.is_empty() {
                status.to_string()
            } else {
                body
            }
        });

    Err(match (status, object_id) {
        (StatusCode::NOT_FOUND, Some(id)) => StorageError::not_found(id),
        (StatusCode::UNAUTHORIZED, _) => StorageError::Unauthorized(message),
        _ => StorageError::remote(status.as_u16(), message),
    })
}

/// Build a `multipart/related` body: JSON metadata part, then the media part.
fn multipart_related(
    boundary: &str,
    display_name: &str,
    content_type: &str,
    media: &[u8],
) -> Result<Bytes, StorageError> {
    let metadata = serde_json::to_vec(&json!({ "name": display_name }))
        .map_err(|e| StorageError::operation(e.to_string()))?;

    let mut body = BytesMut::with_capacity(media.len() + metadata.len() + 256);
    body.put_slice(format!("--{boundary}\r\n").as_bytes());
    body.put_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
    body.put_slice(&metadata);
    body.put_slice(format!("\r\n--{boundary}\r\n").as_bytes());
    body.put_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.put_slice(media);
    body.put_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Ok(body.freeze())
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        // The link is the fixed template applied to the id, nothing else.
        #[test]
        fn prop_direct_link_encodes_id(id in "[A-Za-z0-9_-]{1,64}") {
            let link = direct_link(&id);
            prop_assert!(link.starts_with(DIRECT_LINK_BASE));
            prop_assert_eq!(&link[DIRECT_LINK_BASE.len()..], id.as_str());
        }
    }
}
