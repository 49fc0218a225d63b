//! Inference capability used by the tutor.
//!
//! The tutor never talks to a model directly. It receives an
//! [`InferenceEngine`] at construction time, which lets tests swap in
//! stubs and lets the CLI pick an HTTP engine or none at all.

#[cfg(feature = "http")]
mod http;
mod slot;

#[cfg(feature = "http")]
pub use http::OpenAiCompatibleEngine;
pub use slot::{EngineSlot, EngineStatus};

use crate::errors::InferenceError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default completion length cap.
pub const DEFAULT_MAX_TOKENS: u32 = 600;

/// A system/user message pair plus sampling settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// System instructions.
    pub system: String,
    /// The learner's message.
    pub user: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
}

impl ChatRequest {
    /// Creates a request with default sampling settings.
    #[must_use]
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Sets the temperature.
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the token cap.
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Something that turns a prompt into generated text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InferenceEngine: Send + Sync {
    /// Generates a reply. A single attempt; implementations must not retry.
    async fn complete(&self, request: &ChatRequest) -> Result<String, InferenceError>;
}

/// An engine that is never available. Every question takes the fallback path.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableEngine;

#[async_trait]
impl InferenceEngine for UnavailableEngine {
    async fn complete(&self, _request: &ChatRequest) -> Result<String, InferenceError> {
        Err(InferenceError::NotReady)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_defaults() {
        let req = ChatRequest::new("sys", "hi");
        assert_eq!(req.system, "sys");
        assert_eq!(req.user, "hi");
        assert!((req.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(req.max_tokens, 600);
    }

    #[test]
    fn test_chat_request_builders() {
        let req = ChatRequest::new("s", "u").with_temperature(0.2).with_max_tokens(10);
        assert!((req.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(req.max_tokens, 10);
    }

    #[tokio::test]
    async fn test_unavailable_engine_always_fails() {
        let err = UnavailableEngine
            .complete(&ChatRequest::new("s", "u"))
            .await
            .unwrap_err();
        assert_eq!(err, InferenceError::NotReady);
    }

    #[tokio::test]
    async fn test_mock_engine() {
        let mut mock = MockInferenceEngine::new();
        mock.expect_complete()
            .withf(|req| req.user == "ping")
            .times(1)
            .returning(|_| Ok("pong".to_string()));

        let reply = mock.complete(&ChatRequest::new("s", "ping")).await.unwrap();
        assert_eq!(reply, "pong");
    }
}
