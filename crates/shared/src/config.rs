//! Application configuration management.

use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

/// Plain environment variables mapped onto config keys.
///
/// These win over every other source.
const PLAIN_ENV_OVERRIDES: &[(&str, &str)] = &[
    ("PORT", "server.port"),
    ("OPENAI_API_KEY", "openai.api_key"),
    ("GOOGLE_CLIENT_ID", "storage.google_client_id"),
    ("GOOGLE_CLIENT_SECRET", "storage.google_client_secret"),
    ("GOOGLE_REFRESH_TOKEN", "storage.google_refresh_token"),
];

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Language-model configuration.
    pub openai: OpenAiConfig,
    /// Remote storage configuration.
    #[serde(default)]
    pub storage: StorageSettings,
    /// Upload intake configuration.
    #[serde(default)]
    pub upload: UploadConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

/// OpenAI chat completion configuration.
#[derive(Clone, Deserialize)]
pub struct OpenAiConfig {
    /// API key sent as a bearer token.
    pub api_key: String,
    /// Chat model name.
    #[serde(default = "default_model")]
    pub model: String,
    /// API base URL, without the `/v1` suffix.
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
    /// HTTP client timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

/// Which remote storage backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Google Drive v3.
    #[default]
    GoogleDrive,
    /// Local filesystem (development only).
    LocalFs,
}

/// Remote storage configuration.
#[derive(Clone, Deserialize)]
pub struct StorageSettings {
    /// Selected backend.
    #[serde(default)]
    pub backend: StorageBackend,
    /// Google OAuth2 client id.
    #[serde(default)]
    pub google_client_id: Option<String>,
    /// Google OAuth2 client secret.
    #[serde(default)]
    pub google_client_secret: Option<String>,
    /// Long-lived Google OAuth2 refresh token.
    #[serde(default)]
    pub google_refresh_token: Option<String>,
    /// Root directory for the local backend.
    #[serde(default = "default_local_root")]
    pub local_root: PathBuf,
    /// Base URL the local backend builds public links from.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// HTTP client timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            google_client_id: None,
            google_client_secret: None,
            google_refresh_token: None,
            local_root: default_local_root(),
            public_base_url: default_public_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl fmt::Debug for StorageSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("StorageSettings")
            .field("backend", &self.backend)
            .field("google_client_id", &self.google_client_id)
            .field("google_client_secret", &redact(&self.google_client_secret))
            .field("google_refresh_token", &redact(&self.google_refresh_token))
            .field("local_root", &self.local_root)
            .field("public_base_url", &self.public_base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_local_root() -> PathBuf {
    PathBuf::from("./storage")
}

fn default_public_base_url() -> String {
    "http://localhost:5000/files".to_string()
}

/// Upload intake configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Directory receiving temporary upload files.
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,
    /// Maximum accepted file size in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// Accepted MIME types.
    #[serde(default = "default_allowed_mime_types")]
    pub allowed_mime_types: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            temp_dir: default_temp_dir(),
            max_file_size: default_max_file_size(),
            allowed_mime_types: default_allowed_mime_types(),
        }
    }
}

fn default_temp_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_max_file_size() -> u64 {
    5 * 1024 * 1024 // 5 MiB
}

fn default_allowed_mime_types() -> Vec<String> {
    vec![
        "image/jpeg".to_string(),
        "image/png".to_string(),
        "application/pdf".to_string(),
    ]
}

impl AppConfig {
    /// Loads configuration from config files and the environment.
    ///
    /// Sources, lowest precedence first: `config/default`, `config/{RUN_MODE}`,
    /// `COURIER__SECTION__KEY` variables, then the plain variables such as
    /// `PORT` and `OPENAI_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("COURIER").separator("__"));

        for (var, key) in PLAIN_ENV_OVERRIDES {
            builder = builder.set_override_option(*key, std::env::var(var).ok())?;
        }

        builder.build()?.try_deserialize()
    }
}
