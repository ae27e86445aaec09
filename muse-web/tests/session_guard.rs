//! The session guard brackets every request: public paths pass, every
//! other path needs a signed-in session, and providers are never
//! reached without one.

mod common;

use axum::http::{header, StatusCode};
use common::{get, post_json, sign_in, spawn_app};
use muse_web::config::SessionSettings;
use muse_web::services::identity::MockIdentityProvider;
use muse_web::services::providers::mock::{
    MockAudioProvider, MockChatProvider, MockImageProvider,
};
use muse_web::startup::build_router;
use muse_web::AppState;
use std::sync::Arc;

#[tokio::test]
async fn health_and_landing_are_public() {
    let app = spawn_app();

    let response = get(&app.router, "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(&app.router, "/", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(&app.router, "/sign-in", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn protected_page_redirects_anonymous_user_to_sign_in() {
    let app = spawn_app();

    let response = get(&app.router, "/dashboard", None).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/sign-in"
    );
}

#[tokio::test]
async fn api_without_session_is_unauthorized_and_provider_untouched() {
    let app = spawn_app();

    let response = post_json(
        &app.router,
        "/api/conversation",
        None,
        serde_json::json!({"messages": [{"role": "user", "content": "hi"}]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = post_json(
        &app.router,
        "/api/music",
        None,
        serde_json::json!({"prompt": "a calm piano melody"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    assert_eq!(app.chat.calls(), 0);
    assert_eq!(app.audio.calls(), 0);
    assert_eq!(app.image.calls(), 0);
}

#[tokio::test]
async fn signed_in_user_reaches_protected_pages() {
    let app = spawn_app();
    let cookie = sign_in(&app.router).await;

    for uri in ["/dashboard", "/conversation", "/code", "/image", "/music"] {
        let response = get(&app.router, uri, Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {} failed", uri);
    }
}

#[tokio::test]
async fn rejected_credentials_redirect_back_to_sign_in() {
    let state = AppState::new(
        Arc::new(MockIdentityProvider::rejecting()),
        Arc::new(MockChatProvider::new("reply")),
        Arc::new(MockImageProvider::new()),
        Arc::new(MockAudioProvider::with_url("https://cdn.example/clip.mp3")),
    );
    let router = build_router(state, &SessionSettings::default());

    let body =
        serde_urlencoded::to_string([("email", "dev@example.com"), ("password", "wrong")]).unwrap();
    let response = form_post(router, "/sign-in", body).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/sign-in?error=invalid_credentials"
    );
}

#[tokio::test]
async fn sign_out_invalidates_the_session() {
    let app = spawn_app();
    let cookie = sign_in(&app.router).await;

    let response = get(&app.router, "/sign-out", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");

    let response = get(&app.router, "/dashboard", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/sign-in"
    );
}

async fn form_post(
    router: axum::Router,
    uri: &str,
    body: String,
) -> axum::http::Response<axum::body::Body> {
    use tower::util::ServiceExt;

    router
        .oneshot(
            axum::http::Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(axum::body::Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap()
}
