//! Generative-language backend abstraction.
//!
//! The judge only needs "prompt in, free text out"; everything about the
//! concrete service lives behind this trait so tests can script the backend
//! and the provider can be swapped without touching moderation logic.

mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("request timed out")]
    Timeout,
    #[error("connection error: {0}")]
    Connection(String),
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("backend returned an empty response")]
    Empty,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Runs a single completion. Implementations do not retry.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}
