pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;

use services::identity::IdentityProvider;
use services::providers::{AudioProvider, ChatProvider, ImageProvider};
use std::sync::Arc;

/// Shared application state: the external collaborators behind every
/// feature. All of them are opaque request/response clients; the app
/// keeps no state of its own across requests.
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<dyn IdentityProvider>,
    pub chat: Arc<dyn ChatProvider>,
    pub image: Arc<dyn ImageProvider>,
    pub audio: Arc<dyn AudioProvider>,
}

impl AppState {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        chat: Arc<dyn ChatProvider>,
        image: Arc<dyn ImageProvider>,
        audio: Arc<dyn AudioProvider>,
    ) -> Self {
        Self {
            identity,
            chat,
            image,
            audio,
        }
    }
}
