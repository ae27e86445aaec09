//! Generation endpoints: one provider call per request, no retry, no
//! cross-request state.
//!
//! Conversation and code share a single chat handler parameterized by
//! a feature descriptor; image and music have their own shapes.

use anyhow::anyhow;
use axum::{extract::State, Json};
use validator::Validate;

use crate::middleware::session_guard::CurrentUser;
use crate::models::{
    ChatMessage, ChatRequest, ChatResponse, ImageItem, ImageRequest, MusicRequest, MusicResponse,
};
use crate::services::providers::ProviderError;
use crate::AppState;
use muse_core::error::AppError;

/// Largest image batch a single request may ask for.
const MAX_IMAGE_AMOUNT: u8 = 10;

/// Descriptor distinguishing the chat-shaped features.
struct ChatFeature {
    name: &'static str,
    system_instruction: Option<&'static str>,
}

const CONVERSATION: ChatFeature = ChatFeature {
    name: "conversation",
    system_instruction: None,
};

const CODE: ChatFeature = ChatFeature {
    name: "code",
    system_instruction: Some(
        "You are a code generator. You must answer only in markdown code snippets. \
         Use code comments for explanations.",
    ),
};

pub async fn conversation(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    generate_chat(&state, &user.user_id, &CONVERSATION, request).await
}

pub async fn code(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    generate_chat(&state, &user.user_id, &CODE, request).await
}

async fn generate_chat(
    state: &AppState,
    user_id: &str,
    feature: &ChatFeature,
    request: ChatRequest,
) -> Result<Json<ChatResponse>, AppError> {
    // Credential before input, per the endpoint contract.
    if !state.chat.configured() {
        return Err(AppError::ConfigError(anyhow!(
            "chat provider credential not configured"
        )));
    }

    request.validate()?;

    if request.messages.iter().any(|m| m.content.trim().is_empty()) {
        return Err(AppError::BadRequest(anyhow!(
            "messages must not contain empty content"
        )));
    }

    tracing::info!(
        feature = feature.name,
        user_id,
        message_count = request.messages.len(),
        "generation requested"
    );

    let mut messages = Vec::with_capacity(request.messages.len() + 1);
    if let Some(instruction) = feature.system_instruction {
        messages.push(ChatMessage {
            role: "system".to_string(),
            content: instruction.to_string(),
        });
    }
    messages.extend(request.messages);

    let content = state
        .chat
        .complete(&messages)
        .await
        .map_err(|e| provider_failure(feature.name, e))?;

    Ok(Json(ChatResponse { content }))
}

pub async fn image(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<ImageRequest>,
) -> Result<Json<Vec<ImageItem>>, AppError> {
    if !state.image.configured() {
        return Err(AppError::ConfigError(anyhow!(
            "image provider credential not configured"
        )));
    }

    request.validate()?;
    let count = parse_amount(&request.amount)?;

    tracing::info!(
        feature = "image",
        user_id = %user.user_id,
        count,
        resolution = %request.resolution,
        "generation requested"
    );

    let urls = state
        .image
        .generate(&request.prompt, count, &request.resolution)
        .await
        .map_err(|e| provider_failure("image", e))?;

    Ok(Json(urls.into_iter().map(|url| ImageItem { url }).collect()))
}

pub async fn music(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<MusicRequest>,
) -> Result<Json<MusicResponse>, AppError> {
    if !state.audio.configured() {
        return Err(AppError::ConfigError(anyhow!(
            "audio provider credential not configured"
        )));
    }

    request.validate()?;

    tracing::info!(
        feature = "music",
        user_id = %user.user_id,
        "generation requested"
    );

    let audio = state
        .audio
        .generate(&request.prompt)
        .await
        .map_err(|e| provider_failure("music", e))?;

    Ok(Json(MusicResponse {
        audio,
        content: format!(
            "Here is the generated audio for prompt: \"{}\"",
            request.prompt
        ),
    }))
}

/// The image amount arrives as a string from the form select; parse it
/// explicitly so a garbage value is a 400 instead of reaching the
/// provider.
fn parse_amount(amount: &str) -> Result<u8, AppError> {
    let count: u8 = amount
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(anyhow!("amount must be a number")))?;

    if count == 0 || count > MAX_IMAGE_AMOUNT {
        return Err(AppError::BadRequest(anyhow!(
            "amount must be between 1 and {}",
            MAX_IMAGE_AMOUNT
        )));
    }

    Ok(count)
}

/// Provider failures are terminal: log the detail, surface a generic
/// status. Missing credentials are configuration, not provider, errors.
fn provider_failure(feature: &str, err: ProviderError) -> AppError {
    tracing::error!(feature, error = %err, "provider call failed");

    match err {
        ProviderError::NotConfigured(detail) => AppError::ConfigError(anyhow!(detail)),
        ProviderError::InvalidRequest(detail) => AppError::BadRequest(anyhow!(detail)),
        other => AppError::InternalError(anyhow!("generation failed: {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_parses_within_range() {
        assert_eq!(parse_amount("1").unwrap(), 1);
        assert_eq!(parse_amount("10").unwrap(), 10);
        assert_eq!(parse_amount(" 2 ").unwrap(), 2);
    }

    #[test]
    fn non_numeric_amount_is_bad_request() {
        assert!(matches!(
            parse_amount("many"),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn out_of_range_amount_is_bad_request() {
        assert!(matches!(parse_amount("0"), Err(AppError::BadRequest(_))));
        assert!(matches!(parse_amount("11"), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn not_configured_maps_to_config_error() {
        let err = provider_failure(
            "music",
            ProviderError::NotConfigured("token missing".to_string()),
        );
        assert!(matches!(err, AppError::ConfigError(_)));
    }

    #[test]
    fn api_error_maps_to_internal_error() {
        let err = provider_failure("image", ProviderError::ApiError("boom".to_string()));
        assert!(matches!(err, AppError::InternalError(_)));
    }
}
