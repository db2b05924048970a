//! Storage configuration types.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use courier_shared::{StorageBackend, StorageSettings};

use super::error::StorageError;

/// Google OAuth2 credentials for the Drive backend.
#[derive(Clone)]
pub struct DriveCredentials {
    /// OAuth2 client id.
    pub client_id: String,
    /// OAuth2 client secret.
    pub client_secret: String,
    /// Long-lived refresh token exchanged for access tokens.
    pub refresh_token: String,
}

impl fmt::Debug for DriveCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriveCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

/// Google endpoints used by the Drive backend.
///
/// Overridable so the client can be pointed at a local server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveEndpoints {
    /// OAuth2 token endpoint.
    pub token_url: String,
    /// Base for metadata, permission and delete calls.
    pub api_base: String,
    /// Base for media uploads.
    pub upload_base: String,
}

impl Default for DriveEndpoints {
    fn default() -> Self {
        Self {
            token_url: "https://oauth2.googleapis.com/token".to_string(),
            api_base: "https://www.googleapis.com".to_string(),
            upload_base: "https://www.googleapis.com".to_string(),
        }
    }
}

impl DriveEndpoints {
    /// All endpoints served from a single base URL, token endpoint at `/token`.
    #[must_use]
    pub fn single_host(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            token_url: format!("{base}/token"),
            api_base: base.to_string(),
            upload_base: base.to_string(),
        }
    }
}

/// Storage provider configuration.
#[derive(Debug, Clone)]
pub enum StorageProvider {
    /// Google Drive v3.
    GoogleDrive {
        /// OAuth2 credentials.
        credentials: DriveCredentials,
        /// Endpoints to talk to.
        endpoints: DriveEndpoints,
        /// HTTP client timeout.
        timeout: Duration,
    },
    /// Local filesystem (development only)
    LocalFs {
        /// Root directory path.
        root: PathBuf,
        /// Base URL for public links.
        public_base_url: String,
    },
}

impl StorageProvider {
    /// Create a Google Drive provider against the production endpoints.
    #[must_use]
    pub fn google_drive(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self::GoogleDrive {
            credentials: DriveCredentials {
                client_id: client_id.into(),
                client_secret: client_secret.into(),
                refresh_token: refresh_token.into(),
            },
            endpoints: DriveEndpoints::default(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Create local filesystem provider (development only).
    #[must_use]
    pub fn local_fs(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self::LocalFs {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }

    /// Build a provider from application settings.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a Drive credential is missing.
    pub fn from_settings(settings: &StorageSettings) -> Result<Self, StorageError> {
        match settings.backend {
            StorageBackend::GoogleDrive => {
                let require = |value: &Option<String>, name: &str| {
                    value
                        .clone()
                        .filter(|v| !v.is_empty())
                        .ok_or_else(|| StorageError::configuration(format!("{name} is not set")))
                };

                Ok(Self::GoogleDrive {
                    credentials: DriveCredentials {
                        client_id: require(&settings.google_client_id, "GOOGLE_CLIENT_ID")?,
                        client_secret: require(
                            &settings.google_client_secret,
                            "GOOGLE_CLIENT_SECRET",
                        )?,
                        refresh_token: require(
                            &settings.google_refresh_token,
                            "GOOGLE_REFRESH_TOKEN",
                        )?,
                    },
                    endpoints: DriveEndpoints::default(),
                    timeout: Duration::from_secs(settings.timeout_secs),
                })
            }
            StorageBackend::LocalFs => Ok(Self::local_fs(
                settings.local_root.clone(),
                settings.public_base_url.clone(),
            )),
        }
    }

    /// Get the provider name for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::GoogleDrive { .. } => "google_drive",
            Self::LocalFs { .. } => "local",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive_settings() -> StorageSettings {
        StorageSettings {
            google_client_id: Some("client".to_string()),
            google_client_secret: Some("secret".to_string()),
            google_refresh_token: Some("refresh".to_string()),
            ..StorageSettings::default()
        }
    }

    #[test]
    fn test_from_settings_google_drive() {
        let provider = StorageProvider::from_settings(&drive_settings()).expect("valid settings");
        assert_eq!(provider.name(), "google_drive");
        let StorageProvider::GoogleDrive {
            credentials,
            endpoints,
            timeout,
        } = provider
        else {
            panic!("expected google drive provider");
        };
        assert_eq!(credentials.client_id, "client");
        assert_eq!(endpoints, DriveEndpoints::default());
        assert_eq!(timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_from_settings_missing_secret() {
        let settings = StorageSettings {
            google_client_secret: None,
            ..drive_settings()
        };
        let err = StorageProvider::from_settings(&settings).unwrap_err();
        assert!(matches!(err, StorageError::Configuration(msg) if msg.contains("GOOGLE_CLIENT_SECRET")));
    }

    #[test]
    fn test_from_settings_empty_refresh_token() {
        let settings = StorageSettings {
            google_refresh_token: Some(String::new()),
            ..drive_settings()
        };
        assert!(StorageProvider::from_settings(&settings).is_err());
    }

    #[test]
    fn test_from_settings_local() {
        let settings = StorageSettings {
            backend: StorageBackend::LocalFs,
            ..StorageSettings::default()
        };
        let provider = StorageProvider::from_settings(&settings).expect("valid settings");
        assert_eq!(provider.name(), "local");
    }

    #[test]
    fn test_single_host_endpoints() {
        let endpoints = DriveEndpoints::single_host("http://127.0.0.1:1234/");
        assert_eq!(endpoints.token_url, "http://127.0.0.1:1234/token");
        assert_eq!(endpoints.api_base, "http://127.0.0.1:1234");
        assert_eq!(endpoints.upload_base, "http://127.0.0.1:1234");
    }

    #[test]
    fn test_credentials_debug_redacted() {
        let StorageProvider::GoogleDrive { credentials, .. } =
            StorageProvider::google_drive("id", "s3cret", "r3fresh")
        else {
            panic!("expected google drive provider");
        };
        let rendered = format!("{credentials:?}");
        assert!(!rendered.contains("s3cret"));
        assert!(!rendered.contains("r3fresh"));
    }
}
