//! Core logic for Courier.
//!
//! This crate contains the remote clients and the upload flow with ZERO web
//! framework dependencies.
//!
//! # Modules
//!
//! - `storage` - Remote object storage (Google Drive, local filesystem)
//! - `completion` - Remote text generation (OpenAI Chat Completions)
//! - `upload` - Upload orchestration and intake constraints

pub mod completion;
pub mod storage;
pub mod upload;
