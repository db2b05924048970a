//! Remote completion client.
//!
//! One synchronous request/response call: prompt in, text out. No streaming,
//! no retry.

mod error;
mod openai;

use async_trait::async_trait;

pub use error::CompletionError;
pub use openai::OpenAiCompletionClient;

/// Text-generation service.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Generate a completion for `prompt`.
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}
