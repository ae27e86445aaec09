//! Generative-AI provider abstractions and implementations.
//!
//! Trait-based so the endpoints can swap between the hosted backends
//! (OpenAI, Replicate) and the counting mocks used in tests.

pub mod mock;
pub mod openai;
pub mod replicate;

use crate::models::ChatMessage;
use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
}

/// Trait for conversational/code completion providers.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Whether the provider credential is configured.
    fn configured(&self) -> bool;

    /// Run one completion over the transcript and return the
    /// assistant's reply.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ProviderError>;
}

/// Trait for image synthesis providers.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Whether the provider credential is configured.
    fn configured(&self) -> bool;

    /// Generate `count` images at `size`, returning their URLs in
    /// provider order.
    async fn generate(
        &self,
        prompt: &str,
        count: u8,
        size: &str,
    ) -> Result<Vec<String>, ProviderError>;
}

/// Trait for audio synthesis providers.
#[async_trait]
pub trait AudioProvider: Send + Sync {
    /// Whether the provider credential is configured.
    fn configured(&self) -> bool;

    /// Generate one audio clip and return its URL.
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}
