//! Text summaries through a local LLM

use async_trait::async_trait;
use thiserror::Error;

pub use ollama::OllamaSummarizer;
pub use process::OllamaProcess;

mod ollama;
mod process;

/// System prompt used for every summary
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that summarizes texts. \
    While summarizing, ensure to retain all key points and present them concisely.";

/// Summarizer errors
#[derive(Debug, Error)]
pub enum Error {
    /// The model server could not be reached or answered garbage
    #[error("Request to model server failed: {0}")]
    Request(String),

    /// The model server answered with a non-success status
    #[error("Model server returned {0}: {1}")]
    Status(u16, String),

    /// The model answered without any content
    #[error("No response from the model")]
    EmptyResponse,
}

/// Result type for all summarizer interactions
pub type Result<T> = core::result::Result<T, Error>;

/// Anything that can turn text into a summary
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Generate a summary for the given text
    async fn summarize(&self, text: &str) -> Result<String>;
}
