//! Session guard: classifies each request as public or protected and
//! rejects protected requests that carry no valid session.

use axum::{
    body::Body,
    extract::FromRequestParts,
    http::{request::Parts, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use tower_sessions::Session;

use crate::models::SessionUser;

pub const SESSION_USER_ID_KEY: &str = "user_id";
pub const SESSION_EMAIL_KEY: &str = "email";

/// Paths that never require a session.
const PUBLIC_EXACT: &[&str] = &["/", "/health"];
const PUBLIC_PREFIXES: &[&str] = &["/sign-in", "/sign-up", "/static"];

pub(crate) fn is_public_path(path: &str) -> bool {
    if PUBLIC_EXACT.contains(&path) {
        return true;
    }

    PUBLIC_PREFIXES
        .iter()
        .any(|prefix| path == *prefix || path.strip_prefix(prefix).is_some_and(|rest| rest.starts_with('/')))
}

/// Guard every request: public paths pass through untouched, protected
/// paths require a signed-in user in the session. API callers get a
/// 401 JSON body; page requests are redirected to the sign-in form.
pub async fn session_guard(session: Session, mut request: Request<Body>, next: Next) -> Response {
    let path = request.uri().path().to_string();

    if is_public_path(&path) {
        return next.run(request).await;
    }

    let user_id: Option<String> = session
        .get(SESSION_USER_ID_KEY)
        .await
        .unwrap_or(None);

    match user_id {
        Some(user_id) => {
            let email: String = session
                .get(SESSION_EMAIL_KEY)
                .await
                .unwrap_or(None)
                .unwrap_or_default();

            request
                .extensions_mut()
                .insert(SessionUser { user_id, email });

            next.run(request).await
        }
        None if path.starts_with("/api/") => {
            tracing::warn!(path = %path, "rejected unauthenticated API request");
            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse {
                    error: "Unauthorized".to_string(),
                }),
            )
                .into_response()
        }
        None => Redirect::to("/sign-in").into_response(),
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Extractor to easily get the signed-in user in handlers.
pub struct CurrentUser(pub SessionUser);

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts.extensions.get::<SessionUser>().ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Session user missing from request extensions".to_string(),
            }),
        ))?;

        Ok(CurrentUser(user.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::is_public_path;

    #[test]
    fn root_and_health_are_public() {
        assert!(is_public_path("/"));
        assert!(is_public_path("/health"));
    }

    #[test]
    fn sign_in_and_sub_paths_are_public() {
        assert!(is_public_path("/sign-in"));
        assert!(is_public_path("/sign-in/sso-callback"));
        assert!(is_public_path("/sign-up"));
        assert!(is_public_path("/sign-up/verify"));
    }

    #[test]
    fn static_assets_are_public() {
        assert!(is_public_path("/static/styles.css"));
    }

    #[test]
    fn dashboard_and_api_are_protected() {
        assert!(!is_public_path("/dashboard"));
        assert!(!is_public_path("/conversation"));
        assert!(!is_public_path("/api/conversation"));
        assert!(!is_public_path("/api/music"));
        assert!(!is_public_path("/sign-out"));
    }

    #[test]
    fn prefix_match_requires_a_path_boundary() {
        assert!(!is_public_path("/sign-integration"));
        assert!(!is_public_path("/healthcheck"));
    }
}
