//! Page handlers: the landing page and the four feature pages.
//!
//! Pages are thin: one prompt form plus the view state for in-flight
//! and resolved results. The submit logic lives in each template.

use askama::Template;
use axum::response::IntoResponse;

use crate::middleware::session_guard::CurrentUser;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub email: String,
}

#[derive(Template)]
#[template(path = "conversation.html")]
pub struct ConversationTemplate {
    pub email: String,
}

#[derive(Template)]
#[template(path = "code.html")]
pub struct CodeTemplate {
    pub email: String,
}

#[derive(Template)]
#[template(path = "image.html")]
pub struct ImageTemplate {
    pub email: String,
}

#[derive(Template)]
#[template(path = "music.html")]
pub struct MusicTemplate {
    pub email: String,
}

pub async fn index() -> impl IntoResponse {
    IndexTemplate {}
}

pub async fn health_check() -> &'static str {
    "OK"
}

pub async fn dashboard(CurrentUser(user): CurrentUser) -> impl IntoResponse {
    DashboardTemplate { email: user.email }
}

pub async fn conversation(CurrentUser(user): CurrentUser) -> impl IntoResponse {
    ConversationTemplate { email: user.email }
}

pub async fn code(CurrentUser(user): CurrentUser) -> impl IntoResponse {
    CodeTemplate { email: user.email }
}

pub async fn image(CurrentUser(user): CurrentUser) -> impl IntoResponse {
    ImageTemplate { email: user.email }
}

pub async fn music(CurrentUser(user): CurrentUser) -> impl IntoResponse {
    MusicTemplate { email: user.email }
}
