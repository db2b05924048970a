//! Shared errors and configuration for Courier.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;

pub use config::{AppConfig, OpenAiConfig, StorageBackend, StorageSettings, UploadConfig};
pub use error::{AppError, AppResult};
