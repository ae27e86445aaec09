//! OpenAI provider implementations.
//!
//! Chat completions back the conversation and code endpoints; the
//! images API backs the image endpoint. One outbound call per request,
//! no retry.

use super::{ChatProvider, ImageProvider, ProviderError};
use crate::models::ChatMessage;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// OpenAI API base URL.
const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// OpenAI provider configuration.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// `None` means the credential was never configured; calls fail
    /// with `NotConfigured` rather than the process failing at startup.
    pub api_key: Option<String>,
    pub chat_model: String,
    pub image_model: String,
}

pub struct OpenAiChatProvider {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiChatProvider {
    pub fn new(config: OpenAiConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }
}

fn key_configured(config: &OpenAiConfig) -> bool {
    config.api_key.as_deref().is_some_and(|key| !key.is_empty())
}

fn require_key(config: &OpenAiConfig) -> Result<&str, ProviderError> {
    match config.api_key.as_deref() {
        Some(key) if !key.is_empty() => Ok(key),
        _ => Err(ProviderError::NotConfigured(
            "OpenAI API key not configured".to_string(),
        )),
    }
}

#[async_trait]
impl ChatProvider for OpenAiChatProvider {
    fn configured(&self) -> bool {
        key_configured(&self.config)
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ProviderError> {
        let api_key = require_key(&self.config)?;

        let request = ChatCompletionRequest {
            model: self.config.chat_model.clone(),
            messages: messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.clone(),
                    content: m.content.clone(),
                })
                .collect(),
        };

        tracing::debug!(
            model = %self.config.chat_model,
            message_count = messages.len(),
            "sending chat completion request"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", OPENAI_API_BASE))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimited);
            }

            return Err(ProviderError::ApiError(format!(
                "OpenAI API error {}: {}",
                status, error_text
            )));
        }

        let api_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        api_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| {
                ProviderError::MalformedResponse("completion contained no choices".to_string())
            })
    }
}

pub struct OpenAiImageProvider {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiImageProvider {
    pub fn new(config: OpenAiConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }
}

#[async_trait]
impl ImageProvider for OpenAiImageProvider {
    fn configured(&self) -> bool {
        key_configured(&self.config)
    }

    async fn generate(
        &self,
        prompt: &str,
        count: u8,
        size: &str,
    ) -> Result<Vec<String>, ProviderError> {
        let api_key = require_key(&self.config)?;

        let request = ImageGenerationRequest {
            model: self.config.image_model.clone(),
            prompt: prompt.to_string(),
            n: count,
            size: size.to_string(),
        };

        tracing::debug!(
            model = %self.config.image_model,
            count,
            size,
            "sending image generation request"
        );

        let response = self
            .client
            .post(format!("{}/images/generations", OPENAI_API_BASE))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimited);
            }

            return Err(ProviderError::ApiError(format!(
                "OpenAI API error {}: {}",
                status, error_text
            )));
        }

        let api_response: ImageGenerationResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        let urls: Vec<String> = api_response
            .data
            .into_iter()
            .map(|item| {
                item.url.ok_or_else(|| {
                    ProviderError::MalformedResponse("image entry without url".to_string())
                })
            })
            .collect::<Result<_, _>>()?;

        if urls.is_empty() {
            return Err(ProviderError::MalformedResponse(
                "image response contained no data".to_string(),
            ));
        }

        Ok(urls)
    }
}

// ============================================================================
// OpenAI API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<WireMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: WireMessage,
}

#[derive(Debug, Serialize)]
struct ImageGenerationRequest {
    model: String,
    prompt: String,
    n: u8,
    size: String,
}

#[derive(Debug, Deserialize)]
struct ImageGenerationResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    url: Option<String>,
}
