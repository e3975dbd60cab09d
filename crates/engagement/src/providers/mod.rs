//! Text-generation backends used to summarize chatrooms.

pub mod openai;

use async_trait::async_trait;
use thiserror::Error;

pub use openai::OpenAiSummaryProvider;

/// Failure talking to a text-generation service
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("summary request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("summary service returned status {status}")]
    Status { status: u16 },
    #[error("invalid summary response: {0}")]
    InvalidResponse(String),
    #[error("summary service returned no completion")]
    EmptyCompletion,
}

/// A service that turns a prompt into a single completion.
#[async_trait]
pub trait SummaryProvider: Send + Sync {
    /// Identifier used in logs
    fn name(&self) -> &str;

    /// Complete `prompt` and return the generated text, trimmed.
    async fn complete(&self, prompt: &str) -> Result<String, UpstreamError>;
}
