use serde::{Deserialize, Serialize};
use validator::Validate;

/// Authenticated user attached to a request by the session guard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    pub user_id: String,
    pub email: String,
}

/// One turn of a conversation or code transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Body of `POST /api/conversation` and `POST /api/code`.
///
/// Fields default so an absent field is reported as a 400 by our own
/// validation rather than a body-deserialization rejection.
#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "messages are required"))]
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub content: String,
}

/// Body of `POST /api/image`.
#[derive(Debug, Deserialize, Validate)]
pub struct ImageRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "prompt is required"))]
    pub prompt: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "amount is required"))]
    pub amount: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "resolution is required"))]
    pub resolution: String,
}

/// One generated image, in the order the provider returned them.
#[derive(Debug, Serialize)]
pub struct ImageItem {
    pub url: String,
}

/// Body of `POST /api/music`.
#[derive(Debug, Deserialize, Validate)]
pub struct MusicRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "prompt is required"))]
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct MusicResponse {
    pub audio: String,
    pub content: String,
}
