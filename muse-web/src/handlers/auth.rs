//! Sign-in/sign-up/sign-out handlers.
//!
//! Credentials are relayed to the external identity provider; on
//! success the vouched user is stored in the server-side session.

use askama::Template;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
    Form,
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::middleware::session_guard::{SESSION_EMAIL_KEY, SESSION_USER_ID_KEY};
use crate::services::identity::IdentityError;
use crate::AppState;
use muse_core::error::AppError;

#[derive(Template)]
#[template(path = "sign_in.html")]
pub struct SignInTemplate {}

#[derive(Template)]
#[template(path = "sign_up.html")]
pub struct SignUpTemplate {}

#[derive(Deserialize)]
pub struct CredentialsForm {
    pub email: String,
    pub password: String,
}

pub async fn sign_in_page() -> impl IntoResponse {
    SignInTemplate {}
}

pub async fn sign_up_page() -> impl IntoResponse {
    SignUpTemplate {}
}

pub async fn sign_in(
    State(state): State<AppState>,
    session: Session,
    Form(payload): Form<CredentialsForm>,
) -> Result<impl IntoResponse, AppError> {
    match state.identity.sign_in(&payload.email, &payload.password).await {
        Ok(user) => {
            store_session_user(&session, &user.user_id, &user.email).await?;

            tracing::info!(
                user_id = %user.user_id,
                email = %user.email,
                "user signed in"
            );

            Ok(Redirect::to("/dashboard").into_response())
        }
        Err(IdentityError::Rejected) => {
            Ok(Redirect::to("/sign-in?error=invalid_credentials").into_response())
        }
        Err(e) => {
            tracing::error!(error = %e, "sign-in failed against identity service");
            Ok(Redirect::to("/sign-in?error=service_error").into_response())
        }
    }
}

pub async fn sign_up(
    State(state): State<AppState>,
    session: Session,
    Form(payload): Form<CredentialsForm>,
) -> Result<impl IntoResponse, AppError> {
    match state.identity.sign_up(&payload.email, &payload.password).await {
        Ok(user) => {
            store_session_user(&session, &user.user_id, &user.email).await?;

            tracing::info!(
                user_id = %user.user_id,
                email = %user.email,
                "user registered"
            );

            Ok(Redirect::to("/dashboard").into_response())
        }
        Err(IdentityError::Rejected) => {
            Ok(Redirect::to("/sign-up?error=registration_failed").into_response())
        }
        Err(e) => {
            tracing::error!(error = %e, "sign-up failed against identity service");
            Ok(Redirect::to("/sign-up?error=service_error").into_response())
        }
    }
}

pub async fn sign_out(session: Session) -> impl IntoResponse {
    session.clear().await;
    Redirect::to("/")
}

async fn store_session_user(
    session: &Session,
    user_id: &str,
    email: &str,
) -> Result<(), AppError> {
    session
        .insert(SESSION_USER_ID_KEY, user_id)
        .await
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("session store failed: {}", e)))?;
    session
        .insert(SESSION_EMAIL_KEY, email)
        .await
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("session store failed: {}", e)))?;

    Ok(())
}
