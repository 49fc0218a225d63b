//! OpenAI-compatible chat completion engine.

use super::{ChatRequest, InferenceEngine};
use crate::config::EngineConfig;
use crate::errors::InferenceError;
use crate::observability::SpanTimer;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: [WireMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    choices: Vec<WireChoice>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireReply,
}

#[derive(Debug, Deserialize)]
struct WireReply {
    #[serde(default)]
    content: Option<String>,
}

/// Engine that POSTs to a `/v1/chat/completions` style endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleEngine {
    client: reqwest::Client,
    url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiCompatibleEngine {
    /// Builds an engine from config.
    ///
    /// The API key is read from the environment variable named by
    /// `api_key_env`, if any.
    ///
    /// # Errors
    ///
    /// Fails when no endpoint is configured or the HTTP client cannot be
    /// built.
    pub fn from_config(config: &EngineConfig) -> Result<Self, InferenceError> {
        let endpoint = config
            .endpoint
            .as_deref()
            .ok_or_else(|| InferenceError::Http("no endpoint configured".to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| InferenceError::Http(e.to_string()))?;

        let api_key = config
            .api_key_env
            .as_deref()
            .and_then(|var| std::env::var(var).ok());

        Ok(Self {
            client,
            url: format!("{}/chat/completions", endpoint.trim_end_matches('/')),
            model: config.model_id.clone(),
            api_key,
        })
    }

    /// The full completion URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl InferenceEngine for OpenAiCompatibleEngine {
    async fn complete(&self, request: &ChatRequest) -> Result<String, InferenceError> {
        let body = WireRequest {
            model: &self.model,
            messages: [
                WireMessage {
                    role: "system",
                    content: &request.system,
                },
                WireMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let timer = SpanTimer::start();
        let mut builder = self.client.post(&self.url).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| InferenceError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(InferenceError::Http(format!("{status}: {text}")));
        }

        let parsed: WireResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::runtime(e.to_string()))?;

        debug!(
            model = %self.model,
            latency_ms = timer.elapsed_ms(),
            "Chat completion received"
        );

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(InferenceError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_requires_endpoint() {
        let config = EngineConfig::default();
        let err = OpenAiCompatibleEngine::from_config(&config).unwrap_err();
        assert!(matches!(err, InferenceError::Http(_)));
    }

    #[test]
    fn test_url_joins_endpoint() {
        let config = EngineConfig {
            endpoint: Some("http://localhost:8080/v1/".to_string()),
            ..EngineConfig::default()
        };
        let engine = OpenAiCompatibleEngine::from_config(&config).unwrap();
        assert_eq!(engine.url(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_wire_response_parsing() {
        let json = r#"{"choices":[{"message":{"role":"assistant","content":"Hi!"}}]}"#;
        let parsed: WireResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("Hi!"));
    }

    #[test]
    fn test_wire_request_shape() {
        let body = WireRequest {
            model: "m",
            messages: [
                WireMessage { role: "system", content: "s" },
                WireMessage { role: "user", content: "u" },
            ],
            temperature: 0.5,
            max_tokens: 600,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "u");
        assert_eq!(json["max_tokens"], 600);
    }
}
