//! Upload orchestration.
//!
//! Turns one received file into a publicly shared remote object:
//! store → grant public read → build link → remove the temporary file.
//!
//! Intake constraints ([`UploadPolicy`]) are checked before a file reaches the
//! orchestrator.

mod error;
mod service;
mod types;

pub use error::ValidationError;
pub use service::UploadOrchestrator;
pub use types::{PublishedFile, UploadPolicy, UploadedFile};
