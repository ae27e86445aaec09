use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use time::Duration;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::SessionSettings;
use crate::handlers::{
    auth::{sign_in, sign_in_page, sign_out, sign_up, sign_up_page},
    generate,
    pages::{self, health_check, index},
};
use crate::middleware::session_guard::session_guard;
use crate::AppState;
use muse_core::middleware::tracing::request_id_middleware;

pub fn build_router(state: AppState, session_settings: &SessionSettings) -> Router {
    // Session setup
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false) // Set to true in production with HTTPS
        .with_expiry(Expiry::OnInactivity(Duration::hours(
            session_settings.inactivity_hours,
        )));

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/sign-in", get(sign_in_page).post(sign_in))
        .route("/sign-up", get(sign_up_page).post(sign_up))
        .route("/sign-out", get(sign_out))
        .route("/dashboard", get(pages::dashboard))
        .route("/conversation", get(pages::conversation))
        .route("/code", get(pages::code))
        .route("/image", get(pages::image))
        .route("/music", get(pages::music))
        .route("/api/conversation", post(generate::conversation))
        .route("/api/code", post(generate::code))
        .route("/api/image", post(generate::image))
        .route("/api/music", post(generate::music))
        .nest_service("/static", ServeDir::new("muse-web/static"))
        // The guard runs inside the session layer so it can read the
        // session; everything below it is protected unless public.
        .layer(from_fn(session_guard))
        .layer(session_layer)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
