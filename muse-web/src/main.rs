use dotenvy::dotenv;
use muse_core::observability::init_tracing;
use muse_web::config::get_configuration;
use muse_web::services::identity::HttpIdentityProvider;
use muse_web::services::providers::openai::{
    OpenAiChatProvider, OpenAiConfig, OpenAiImageProvider,
};
use muse_web::services::providers::replicate::{ReplicateAudioProvider, ReplicateConfig};
use muse_web::startup::build_router;
use muse_web::AppState;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    init_tracing("muse-web", "info");

    let settings = get_configuration().map_err(|e| {
        tracing::error!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    if settings.openai.api_key.is_none() {
        tracing::warn!("OpenAI API key not configured; conversation, code and image generation will fail");
    }
    if settings.replicate.api_token.is_none() {
        tracing::warn!("Replicate API token not configured; music generation will fail");
    }

    let openai_config = OpenAiConfig {
        api_key: settings.openai.api_key.clone(),
        chat_model: settings.openai.chat_model.clone(),
        image_model: settings.openai.image_model.clone(),
    };

    let state = AppState::new(
        Arc::new(HttpIdentityProvider::new(settings.identity.clone())),
        Arc::new(OpenAiChatProvider::new(openai_config.clone())),
        Arc::new(OpenAiImageProvider::new(openai_config)),
        Arc::new(ReplicateAudioProvider::new(ReplicateConfig {
            api_token: settings.replicate.api_token.clone(),
            music_version: settings.replicate.music_version.clone(),
        })),
    );

    let app = build_router(state, &settings.session);

    let address = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
        anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
    })?;

    info!("Starting muse-web on {}", address);
    axum::serve(listener, app).await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
