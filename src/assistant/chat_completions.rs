//! OpenAI Chat Completions API assistant.
//!
//! Sends one non-streaming request per query to the provider's chat
//! completions endpoint and returns the first choice's text.

use serde::Serialize;
use tracing::debug;

use super::prompt::render_answer_prompt;
use super::provider::AuthStyle;
use super::{Assistant, AssistantError, ChatMessage, LlmSettings};

/// Request body for `/v1/chat/completions`.
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage>,
}

/// Assistant backed by an OpenAI-compatible chat completions endpoint.
#[derive(Clone)]
pub struct ChatCompletionsAssistant {
    http: reqwest::Client,
    settings: LlmSettings,
    url: String,
}

impl std::fmt::Debug for ChatCompletionsAssistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsAssistant")
            .field("url", &self.url)
            .field("model", &self.settings.model)
            .finish_non_exhaustive()
    }
}

impl ChatCompletionsAssistant {
    /// Create an assistant with the given settings.
    #[must_use]
    pub fn new(settings: LlmSettings) -> Self {
        Self::with_client(settings, reqwest::Client::new())
    }

    /// Create an assistant with a custom reqwest client.
    #[must_use]
    pub fn with_client(settings: LlmSettings, http: reqwest::Client) -> Self {
        let url = settings.provider.build_chat_url(&settings.base_url);
        Self {
            http,
            settings,
            url,
        }
    }

    /// Chat completions URL requests are sent to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl Assistant for ChatCompletionsAssistant {
    async fn answer(&self, query: &str) -> Result<String, AssistantError> {
        let prompt = render_answer_prompt(query, &self.settings.support_contact);
        let body = CompletionRequest {
            model: &self.settings.model,
            temperature: self.settings.temperature,
            messages: vec![ChatMessage::user(prompt)],
        };

        let mut rb = self.http.post(&self.url).json(&body);
        if let Some(key) = &self.settings.api_key {
            rb = match self.settings.provider.auth_style() {
                AuthStyle::Bearer => rb.bearer_auth(key),
                AuthStyle::ApiKeyHeader => rb.header("api-key", key),
            };
        }

        let resp = rb.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".into());
            return Err(AssistantError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let v: serde_json::Value = resp.json().await?;
        if let Some(usage) = v.get("usage") {
            debug!(name: "llm.usage", usage = %usage, "Completion usage");
        }

        v["choices"][0]["message"]["content"]
            .as_str()
            .filter(|s| !s.trim().is_empty())
            .map(ToString::to_string)
            .ok_or(AssistantError::EmptyCompletion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};

    use axum::{
        Json, Router,
        extract::State,
        http::{HeaderMap, StatusCode, Uri},
        routing::post,
    };
    use serde_json::{Value, json};

    use crate::assistant::Provider;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Option<(Uri, HeaderMap, Value)>>>);

    async fn fake_llm(reply: Value) -> (String, Captured) {
        fake_llm_at("/v1/chat/completions", reply).await
    }

    async fn fake_llm_at(path: &str, reply: Value) -> (String, Captured) {
        let captured = Captured::default();
        let app = Router::new()
            .route(
                path,
                post(
                    move |State(captured): State<Captured>,
                          uri: Uri,
                          headers: HeaderMap,
                          Json(body): Json<Value>| {
                        let reply = reply.clone();
                        async move {
                            *captured.0.lock().unwrap() = Some((uri, headers, body));
                            Json(reply)
                        }
                    },
                ),
            )
            .with_state(captured.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}"), captured)
    }

    fn settings(base_url: String, api_key: Option<&str>) -> LlmSettings {
        LlmSettings {
            provider: Provider::detect_from_url(&base_url),
            base_url,
            api_key: api_key.map(ToString::to_string),
            model: "gpt-3.5-turbo-16k".to_string(),
            temperature: 0.0,
            support_contact: "the help desk".to_string(),
        }
    }

    #[tokio::test]
    async fn test_answer_returns_first_choice() {
        let (base, captured) = fake_llm(json!({
            "choices": [{ "message": { "role": "assistant", "content": "Use a route table." } }]
        }))
        .await;
        let assistant = ChatCompletionsAssistant::new(settings(base, Some("sk-test")));

        let answer = assistant.answer("How do subnets route?").await.unwrap();
        assert_eq!(answer, "Use a route table.");

        let (_, headers, body) = captured.0.lock().unwrap().take().unwrap();
        assert_eq!(headers["authorization"], "Bearer sk-test");
        assert_eq!(body["model"], "gpt-3.5-turbo-16k");
        assert_eq!(body["temperature"], 0.0);
        assert_eq!(body["messages"][0]["role"], "user");
        let prompt = body["messages"][0]["content"].as_str().unwrap();
        assert!(prompt.contains("Question: How do subnets route?"));
        assert!(prompt.contains("the help desk"));
    }

    #[tokio::test]
    async fn test_no_key_sends_no_auth_header() {
        let (base, captured) = fake_llm(json!({
            "choices": [{ "message": { "content": "ok" } }]
        }))
        .await;
        let assistant = ChatCompletionsAssistant::new(settings(base, None));

        assistant.answer("q").await.unwrap();

        let (_, headers, _) = captured.0.lock().unwrap().take().unwrap();
        assert!(headers.get("authorization").is_none());
    }

    #[tokio::test]
    async fn test_azure_uses_deployment_url_and_api_key_header() {
        let (base, captured) = fake_llm_at(
            "/openai/deployments/docs-gpt/chat/completions",
            json!({ "choices": [{ "message": { "content": "Peering is regional." } }] }),
        )
        .await;
        let mut settings = settings(base, Some("azure-key"));
        settings.provider = Provider::AzureOpenAI {
            deployment_name: "docs-gpt".to_string(),
            api_version: "2024-08-01-preview".to_string(),
        };
        let assistant = ChatCompletionsAssistant::new(settings);

        let answer = assistant.answer("Is peering global?").await.unwrap();
        assert_eq!(answer, "Peering is regional.");

        let (uri, headers, _) = captured.0.lock().unwrap().take().unwrap();
        assert_eq!(uri.query(), Some("api-version=2024-08-01-preview"));
        assert_eq!(headers["api-key"], "azure-key");
        assert!(headers.get("authorization").is_none());
    }

    #[tokio::test]
    async fn test_empty_completion() {
        let (base, _) = fake_llm(json!({ "choices": [] })).await;
        let assistant = ChatCompletionsAssistant::new(settings(base, None));

        let err = assistant.answer("q").await.unwrap_err();
        assert!(matches!(err, AssistantError::EmptyCompletion));
    }

    #[tokio::test]
    async fn test_api_error_status() {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|| async { (StatusCode::UNAUTHORIZED, "invalid api key") }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        let assistant = ChatCompletionsAssistant::new(settings(format!("http://{addr}"), None));

        match assistant.answer("q").await.unwrap_err() {
            AssistantError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "invalid api key");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
