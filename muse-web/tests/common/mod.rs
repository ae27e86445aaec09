#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use muse_web::config::SessionSettings;
use muse_web::services::identity::MockIdentityProvider;
use muse_web::services::providers::mock::{
    MockAudioProvider, MockChatProvider, MockImageProvider,
};
use muse_web::startup::build_router;
use muse_web::AppState;
use std::sync::Arc;
use tower::util::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub chat: Arc<MockChatProvider>,
    pub image: Arc<MockImageProvider>,
    pub audio: Arc<MockAudioProvider>,
}

/// Build the full router against counting mock providers and an
/// identity service that accepts any credentials.
pub fn spawn_app() -> TestApp {
    spawn_app_with_audio(MockAudioProvider::with_url("https://cdn.example/clip.mp3"))
}

pub fn spawn_app_with_audio(audio: MockAudioProvider) -> TestApp {
    let chat = Arc::new(MockChatProvider::new(
        "fn main() {\n    println!(\"hello world\");\n}",
    ));
    let image = Arc::new(MockImageProvider::new());
    let audio = Arc::new(audio);

    let state = AppState::new(
        Arc::new(MockIdentityProvider::accepting()),
        chat.clone(),
        image.clone(),
        audio.clone(),
    );

    let router = build_router(state, &SessionSettings::default());

    TestApp {
        router,
        chat,
        image,
        audio,
    }
}

/// Sign in through the real handler and hand back the session cookie.
pub async fn sign_in(router: &Router) -> String {
    let body = serde_urlencoded::to_string([("email", "dev@example.com"), ("password", "secret")])
        .unwrap();

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/sign-in")
                .header(
                    header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("sign-in should set a session cookie")
        .to_str()
        .unwrap();

    cookie.split(';').next().unwrap().to_string()
}

pub async fn get(router: &Router, uri: &str, cookie: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    router
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(
    router: &Router,
    uri: &str,
    cookie: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    router
        .clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
