//! Client for the external identity service.
//!
//! Sessions are issued by an external provider; this app only relays
//! credentials and stores the returned user in its server-side session.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::config::IdentitySettings;

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("invalid credentials")]
    Rejected,

    #[error("identity service error: {0}")]
    ServiceError(String),

    #[error("network error: {0}")]
    NetworkError(String),

    #[error("malformed identity response: {0}")]
    MalformedResponse(String),
}

/// The user the identity service vouches for.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub user_id: String,
    pub email: String,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, IdentityError>;
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, IdentityError>;
}

pub struct HttpIdentityProvider {
    client: Client,
    settings: IdentitySettings,
}

impl HttpIdentityProvider {
    pub fn new(settings: IdentitySettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    async fn post_credentials(
        &self,
        path: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthUser, IdentityError> {
        let url = format!("{}{}", self.settings.url, path);

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send POST request to {}: {}", url, e);
                IdentityError::NetworkError(e.to_string())
            })?;

        let status = response.status();
        if status.is_client_error() {
            return Err(IdentityError::Rejected);
        }
        if !status.is_success() {
            return Err(IdentityError::ServiceError(format!(
                "identity service returned {}",
                status
            )));
        }

        response
            .json::<AuthUser>()
            .await
            .map_err(|e| IdentityError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, IdentityError> {
        self.post_credentials("/auth/login", email, password).await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, IdentityError> {
        self.post_credentials("/auth/register", email, password)
            .await
    }
}

/// Identity provider for tests: accepts or rejects every credential.
pub struct MockIdentityProvider {
    accept: bool,
}

impl MockIdentityProvider {
    pub fn accepting() -> Self {
        Self { accept: true }
    }

    pub fn rejecting() -> Self {
        Self { accept: false }
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn sign_in(&self, email: &str, _password: &str) -> Result<AuthUser, IdentityError> {
        if self.accept {
            Ok(AuthUser {
                user_id: "user_1".to_string(),
                email: email.to_string(),
            })
        } else {
            Err(IdentityError::Rejected)
        }
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, IdentityError> {
        self.sign_in(email, password).await
    }
}
