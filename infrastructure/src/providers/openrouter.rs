//! OpenRouter generation gateway
//!
//! Every model, including Anthropic ones, is reached through OpenRouter's
//! OpenAI-compatible chat completions endpoint.

use crate::config::{API_KEY_ENV_VARS, FileProviderConfig};
use async_trait::async_trait;
use council_application::{GenerationGateway, ProviderError};
use council_domain::ModelId;
use council_domain::core::string::truncate;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Longest error body echoed back in a [`ProviderError`]
const MAX_ERROR_BODY: usize = 500;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Map a council model id to an OpenRouter model slug.
///
/// `openrouter:` ids already carry the slug; any other provider prefix
/// becomes the slug's vendor segment (`anthropic:claude-x` → `anthropic/claude-x`).
pub fn model_slug(model: &ModelId) -> String {
    match model.provider() {
        "openrouter" => model.name().to_string(),
        provider => format!("{}/{}", provider, model.name()),
    }
}

pub struct OpenRouterGateway {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenRouterGateway {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::new(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Build from the `[provider]` section, resolving the key from the environment
    pub fn from_config(config: &FileProviderConfig) -> Result<Self, ProviderError> {
        let api_key = config.resolve_api_key().ok_or_else(|| {
            ProviderError::new(format!("{} required", API_KEY_ENV_VARS.join(" or ")))
        })?;
        Self::new(api_key, config.base_url.clone(), config.timeout())
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl GenerationGateway for OpenRouterGateway {
    async fn generate(
        &self,
        prompt: &str,
        model: &ModelId,
        temperature: f32,
    ) -> Result<String, ProviderError> {
        let slug = model_slug(model);
        let request = ChatRequest {
            model: &slug,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature,
        };

        debug!("POST {} (model: {}, temperature: {})", self.endpoint(), slug, temperature);
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::new(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::with_status(
                status.as_u16(),
                truncate(body.trim(), MAX_ERROR_BODY),
            ));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::new(format!("malformed response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::new("malformed response: no message content"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway(server: &MockServer) -> OpenRouterGateway {
        OpenRouterGateway::new("sk-test", server.uri(), Duration::from_secs(5)).unwrap()
    }

    fn completion(content: &str) -> serde_json::Value {
        json!({
            "id": "gen-1",
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
        })
    }

    #[test]
    fn test_model_slug() {
        let deepseek = ModelId::parse("openrouter:deepseek/deepseek-v3.2").unwrap();
        assert_eq!(model_slug(&deepseek), "deepseek/deepseek-v3.2");

        let sonnet = ModelId::parse("anthropic:claude-sonnet-4-5-20250929").unwrap();
        assert_eq!(model_slug(&sonnet), "anthropic/claude-sonnet-4-5-20250929");
    }

    #[tokio::test]
    async fn test_generate_sends_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "anthropic/claude-sonnet-4-5-20250929",
                "temperature": 0.6,
                "messages": [{ "role": "user", "content": "Review this" }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("Looks risky.")))
            .expect(1)
            .mount(&server)
            .await;

        let text = gateway(&server)
            .generate("Review this", &ModelId::default_ceo(), 0.6)
            .await
            .unwrap();
        assert_eq!(text, "Looks risky.");
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let err = gateway(&server)
            .generate("hi", &ModelId::default_executive(), 0.7)
            .await
            .unwrap_err();
        assert_eq!(err.status_code, Some(429));
        assert_eq!(err.message, "rate limited");
    }

    #[tokio::test]
    async fn test_malformed_body_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let err = gateway(&server)
            .generate("hi", &ModelId::default_executive(), 0.7)
            .await
            .unwrap_err();
        assert_eq!(err.status_code, None);
        assert!(err.message.contains("malformed"));
    }

    #[tokio::test]
    async fn test_trailing_slash_in_base_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
            .expect(1)
            .mount(&server)
            .await;

        let gateway =
            OpenRouterGateway::new("k", format!("{}/", server.uri()), Duration::from_secs(5))
                .unwrap();
        assert_eq!(
            gateway
                .generate("hi", &ModelId::default_executive(), 0.7)
                .await
                .unwrap(),
            "ok"
        );
    }
}
