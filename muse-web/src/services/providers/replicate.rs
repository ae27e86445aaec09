//! Replicate audio provider implementation.
//!
//! The music endpoint runs the pinned musicgen model as a Replicate
//! prediction: create, then poll until the prediction settles. The
//! prediction `output` is decoded as a tagged union because the model
//! returns a bare URL, a URL list, or an object depending on version.

use super::{AudioProvider, ProviderError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Replicate API base URL.
const REPLICATE_API_BASE: &str = "https://api.replicate.com/v1";

/// Polling cadence for pending predictions.
const POLL_INTERVAL: std::time::Duration = std::time::Duration::from_secs(1);

/// Upper bound on polling; past this the generation is treated as failed.
const MAX_POLL_ATTEMPTS: u32 = 120;

/// Replicate provider configuration.
#[derive(Debug, Clone)]
pub struct ReplicateConfig {
    pub api_token: Option<String>,
    /// Model version hash for meta/musicgen.
    pub music_version: String,
}

pub struct ReplicateAudioProvider {
    config: ReplicateConfig,
    client: Client,
}

impl ReplicateAudioProvider {
    pub fn new(config: ReplicateConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    fn api_token(&self) -> Result<&str, ProviderError> {
        match self.config.api_token.as_deref() {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(ProviderError::NotConfigured(
                "Replicate API token not configured".to_string(),
            )),
        }
    }

    async fn fetch_prediction(
        &self,
        token: &str,
        url: &str,
    ) -> Result<Prediction, ProviderError> {
        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Token {}", token))
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProviderError::ApiError(format!(
                "Replicate API error {} while polling",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl AudioProvider for ReplicateAudioProvider {
    fn configured(&self) -> bool {
        self.config
            .api_token
            .as_deref()
            .is_some_and(|token| !token.is_empty())
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let token = self.api_token()?;

        let request = CreatePredictionRequest {
            version: self.config.music_version.clone(),
            input: MusicGenInput {
                prompt: prompt.to_string(),
                model_version: "stereo-large".to_string(),
                output_format: "mp3".to_string(),
            },
        };

        tracing::debug!(
            version = %self.config.music_version,
            prompt_len = prompt.len(),
            "creating music prediction"
        );

        let response = self
            .client
            .post(format!("{}/predictions", REPLICATE_API_BASE))
            .header("Authorization", format!("Token {}", token))
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
                "Replicate API error {}: {}",
                status, error_text
            )));
        }

        let mut prediction: Prediction = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        let poll_url = prediction
            .urls
            .as_ref()
            .map(|u| u.get.clone())
            .unwrap_or_else(|| {
                format!("{}/predictions/{}", REPLICATE_API_BASE, prediction.id)
            });

        let mut attempts = 0u32;
        loop {
            match prediction.status.as_str() {
                "succeeded" => break,
                "failed" | "canceled" => {
                    return Err(ProviderError::ApiError(format!(
                        "prediction {}: {}",
                        prediction.status,
                        prediction.error.unwrap_or_default()
                    )));
                }
                _ => {
                    attempts += 1;
                    if attempts > MAX_POLL_ATTEMPTS {
                        return Err(ProviderError::ApiError(
                            "prediction did not settle in time".to_string(),
                        ));
                    }
                    tokio::time::sleep(POLL_INTERVAL).await;
                    prediction = self.fetch_prediction(token, &poll_url).await?;
                }
            }
        }

        prediction
            .output
            .and_then(PredictionOutput::resolve_url)
            .ok_or_else(|| {
                ProviderError::MalformedResponse(
                    "prediction succeeded without an audio url".to_string(),
                )
            })
    }
}

// ============================================================================
// Replicate API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct CreatePredictionRequest {
    version: String,
    input: MusicGenInput,
}

#[derive(Debug, Serialize)]
struct MusicGenInput {
    prompt: String,
    model_version: String,
    output_format: String,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    id: String,
    status: String,
    #[serde(default)]
    urls: Option<PredictionUrls>,
    #[serde(default)]
    output: Option<PredictionOutput>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PredictionUrls {
    get: String,
}

/// The model's `output` field varies by version: a bare URL string, a
/// list of URLs, or an object carrying a `url`. Decoded exhaustively;
/// anything else is a malformed response.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PredictionOutput {
    Url(String),
    Urls(Vec<String>),
    Object { url: Option<String> },
}

impl PredictionOutput {
    fn resolve_url(self) -> Option<String> {
        match self {
            PredictionOutput::Url(url) if !url.is_empty() => Some(url),
            PredictionOutput::Url(_) => None,
            PredictionOutput::Urls(urls) => urls.into_iter().find(|u| !u.is_empty()),
            PredictionOutput::Object { url } => url.filter(|u| !u.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(value: serde_json::Value) -> Option<PredictionOutput> {
        serde_json::from_value(value).ok()
    }

    #[test]
    fn output_as_bare_string_resolves() {
        let output = decode(serde_json::json!("https://cdn.example/clip.mp3")).unwrap();
        assert_eq!(
            output.resolve_url().as_deref(),
            Some("https://cdn.example/clip.mp3")
        );
    }

    #[test]
    fn output_as_array_resolves_first_nonempty() {
        let output = decode(serde_json::json!(["", "https://cdn.example/clip.mp3"])).unwrap();
        assert_eq!(
            output.resolve_url().as_deref(),
            Some("https://cdn.example/clip.mp3")
        );
    }

    #[test]
    fn output_as_object_resolves_url_field() {
        let output = decode(serde_json::json!({"url": "https://cdn.example/clip.mp3"})).unwrap();
        assert_eq!(
            output.resolve_url().as_deref(),
            Some("https://cdn.example/clip.mp3")
        );
    }

    #[test]
    fn object_without_url_resolves_to_none() {
        let output = decode(serde_json::json!({"detail": "no audio"})).unwrap();
        assert!(output.resolve_url().is_none());
    }

    #[test]
    fn empty_string_resolves_to_none() {
        let output = decode(serde_json::json!("")).unwrap();
        assert!(output.resolve_url().is_none());
    }

    #[test]
    fn prediction_decodes_with_absent_output() {
        let prediction: Prediction = serde_json::from_value(serde_json::json!({
            "id": "abc123",
            "status": "processing"
        }))
        .unwrap();
        assert!(prediction.output.is_none());
        assert_eq!(prediction.status, "processing");
    }
}
