//! OpenAI-compatible chat completion client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::error::{CompletionError, CompletionResult};
use crate::traits::Completer;

/// Connection settings for [`ChatCompleter`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Full URL of the chat completions endpoint.
    pub endpoint: String,
    pub model: String,
    /// Bearer token. Requests are sent without `Authorization` when unset.
    #[serde(skip)]
    pub api_key: Option<String>,
    /// Sent as `HTTP-Referer` (used by OpenRouter for attribution).
    pub referer: Option<String>,
    /// Sent as `X-Title`.
    pub title: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://openrouter.ai/api/v1/chat/completions".to_string(),
            model: "gpt-oss-120b".to_string(),
            api_key: None,
            referer: Some("http://localhost:5173".to_string()),
            title: Some("Prompt Optimizer".to_string()),
            timeout_secs: 120,
        }
    }
}

/// Chat completions over HTTP.
///
/// Sends a system and a user message and returns
/// `choices[0].message.content` from the response.
pub struct ChatCompleter {
    config: ChatConfig,
    client: reqwest::Client,
}

impl ChatCompleter {
    pub fn new(config: ChatConfig) -> CompletionResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| CompletionError::Config(e.to_string()))?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    fn request_body(&self, system: &str, user: &str) -> Value {
        json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
        })
    }
}

#[async_trait]
impl Completer for ChatCompleter {
    async fn complete(&self, system: &str, user: &str) -> CompletionResult<String> {
        let mut request = self
            .client
            .post(&self.config.endpoint)
            .header("Content-Type", "application/json")
            .json(&self.request_body(system, user));
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }
        if let Some(referer) = &self.config.referer {
            request = request.header("HTTP-Referer", referer);
        }
        if let Some(title) = &self.config.title {
            request = request.header("X-Title", title);
        }

        debug!(endpoint = %self.config.endpoint, model = %self.config.model, "sending completion request");
        let resp = request
            .send()
            .await
            .map_err(|e| CompletionError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "completion request failed");
            return Err(CompletionError::Http {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| CompletionError::MalformedResponse(e.to_string()))?;

        body.pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                CompletionError::MalformedResponse("missing choices[0].message.content".into())
            })
    }

    fn provider_name(&self) -> &str {
        "chat"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> ChatConfig {
        ChatConfig {
            endpoint: format!("{}/api/v1/chat/completions", server.uri()),
            api_key: Some("test-key".into()),
            ..ChatConfig::default()
        }
    }

    #[tokio::test]
    async fn returns_first_choice_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(header("x-title", "Prompt Optimizer"))
            .and(body_partial_json(json!({
                "model": "gpt-oss-120b",
                "messages": [
                    { "role": "system", "content": "sys" },
                    { "role": "user", "content": "make it better" },
                ],
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "role": "assistant", "content": "{\"optimized\":\"better\"}" } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ChatCompleter::new(config_for(&server)).unwrap();
        let text = client.complete("sys", "make it better").await.unwrap();
        assert_eq!(text, "{\"optimized\":\"better\"}");
    }

    #[tokio::test]
    async fn non_success_status_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let client = ChatCompleter::new(config_for(&server)).unwrap();
        let err = client.complete("sys", "hi").await.unwrap_err();
        assert_eq!(
            err,
            CompletionError::Http { status: 401, reason: "Unauthorized".into() }
        );
        assert_eq!(err.to_string(), "API error: 401 Unauthorized");
    }

    #[tokio::test]
    async fn missing_content_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let client = ChatCompleter::new(config_for(&server)).unwrap();
        let err = client.complete("sys", "hi").await.unwrap_err();
        assert!(matches!(err, CompletionError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_network_error() {
        let config = ChatConfig {
            endpoint: "http://127.0.0.1:1/v1/chat/completions".into(),
            timeout_secs: 5,
            ..ChatConfig::default()
        };
        let client = ChatCompleter::new(config).unwrap();
        let err = client.complete("sys", "hi").await.unwrap_err();
        assert!(matches!(err, CompletionError::Network(_)));
    }

    #[test]
    fn default_config_targets_openrouter() {
        let c = ChatConfig::default();
        assert!(c.endpoint.starts_with("https://openrouter.ai/"));
        assert_eq!(c.model, "gpt-oss-120b");
        assert!(c.api_key.is_none());
    }
}
