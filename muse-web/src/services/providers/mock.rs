//! Mock provider implementations for testing.
//!
//! Each mock counts its invocations so tests can assert that auth and
//! validation failures never reach a provider.

use super::{AudioProvider, ChatProvider, ImageProvider, ProviderError};
use crate::models::ChatMessage;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Mock chat provider returning a canned reply.
#[derive(Default)]
pub struct MockChatProvider {
    reply: String,
    calls: AtomicUsize,
}

impl MockChatProvider {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    fn configured(&self) -> bool {
        true
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if messages.is_empty() {
            return Err(ProviderError::InvalidRequest(
                "empty transcript".to_string(),
            ));
        }

        Ok(self.reply.clone())
    }
}

/// Mock image provider fabricating `count` URLs.
#[derive(Default)]
pub struct MockImageProvider {
    calls: AtomicUsize,
}

impl MockImageProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageProvider for MockImageProvider {
    fn configured(&self) -> bool {
        true
    }

    async fn generate(
        &self,
        _prompt: &str,
        count: u8,
        size: &str,
    ) -> Result<Vec<String>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        Ok((0..count)
            .map(|i| format!("https://images.example/{}-{}.png", size, i))
            .collect())
    }
}

/// Mock audio provider; `url: None` simulates a prediction that
/// succeeded without a resolvable audio location.
#[derive(Default)]
pub struct MockAudioProvider {
    url: Option<String>,
    calls: AtomicUsize,
}

impl MockAudioProvider {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn without_url() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AudioProvider for MockAudioProvider {
    fn configured(&self) -> bool {
        true
    }

    async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        self.url.clone().ok_or_else(|| {
            ProviderError::MalformedResponse(
                "prediction succeeded without an audio url".to_string(),
            )
        })
    }
}
