use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{parse_base_url, require_model, send_json, ChatModel, LlmError};
use crate::domain::types::{ChatMessage, ModelOutput};

const PROVIDER: &str = "Groq";

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Hosted inference via Groq's OpenAI-compatible chat completions API
pub struct GroqClient {
    http: reqwest::Client,
    model: String,
    api_key: String,
    endpoint: String,
}

impl GroqClient {
    pub fn new(model: &str, api_key: &str, base_url: &str) -> Result<Self, LlmError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(LlmError::MissingApiKey { provider: PROVIDER });
        }
        let model = require_model(PROVIDER, model)?;
        let base_url = parse_base_url(PROVIDER, base_url)?;

        Ok(Self {
            http: reqwest::Client::new(),
            model,
            api_key: api_key.to_string(),
            endpoint: format!("{}/chat/completions", base_url),
        })
    }
}

// Hand-written so the key never lands in logs
impl std::fmt::Debug for GroqClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqClient")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ChatModel for GroqClient {
    fn name(&self) -> &str {
        &self.model
    }

    async fn invoke(&self, messages: &[ChatMessage]) -> Result<ModelOutput, LlmError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            stream: false,
        };

        let response: ChatCompletionResponse = send_json(
            PROVIDER,
            self.http
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(&request),
        )
        .await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or(LlmError::EmptyResponse { provider: PROVIDER })?;

        Ok(ModelOutput {
            content: choice.message.content.unwrap_or_default(),
            model: response.model.unwrap_or_else(|| self.model.clone()),
            finish_reason: choice.finish_reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::test_server::{closed_port_url, serve_once};
    use crate::domain::types::Role;

    fn messages() -> Vec<ChatMessage> {
        vec![
            ChatMessage::new(Role::System, "Be brief."),
            ChatMessage::new(Role::User, "Question: ping"),
        ]
    }

    #[test]
    fn empty_api_key_fails_construction() {
        for key in ["", "   "] {
            let err = GroqClient::new(DEFAULT_MODEL, key, DEFAULT_BASE_URL).unwrap_err();
            assert!(matches!(err, LlmError::MissingApiKey { provider: "Groq" }));
        }
    }

    #[test]
    fn debug_output_hides_api_key() {
        let client = GroqClient::new(DEFAULT_MODEL, "gsk-secret", DEFAULT_BASE_URL).unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("gsk-secret"));
        assert!(debug.contains(DEFAULT_MODEL));
    }

    #[tokio::test]
    async fn sends_chat_completion_and_reads_first_choice() {
        let (base_url, seen) = serve_once(
            200,
            r#"{"id":"x","model":"llama-3.3-70b-versatile","choices":[{"index":0,"message":{"role":"assistant","content":"pong"},"finish_reason":"stop"}]}"#,
        )
        .await;

        let client = GroqClient::new(DEFAULT_MODEL, "gsk-test", &base_url).unwrap();
        let output = client.invoke(&messages()).await.unwrap();

        assert_eq!(output.content, "pong");
        assert_eq!(output.model, DEFAULT_MODEL);
        assert_eq!(output.finish_reason.as_deref(), Some("stop"));

        let request = seen.await.unwrap();
        assert!(request.head.starts_with("POST /chat/completions "));
        assert!(request.head.to_ascii_lowercase().contains("authorization: bearer gsk-test"));
        let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(body["model"], DEFAULT_MODEL);
        assert_eq!(body["stream"], false);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "Question: ping");
    }

    #[tokio::test]
    async fn auth_rejection_is_an_api_error() {
        let (base_url, _seen) = serve_once(
            401,
            r#"{"error":{"message":"Invalid API Key","type":"invalid_request_error","code":"invalid_api_key"}}"#,
        )
        .await;

        let client = GroqClient::new(DEFAULT_MODEL, "gsk-wrong", &base_url).unwrap();
        let err = client.invoke(&messages()).await.unwrap_err();

        match err {
            LlmError::Api { status, message, .. } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid API Key");
            }
            other => panic!("expected API error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn no_choices_is_an_empty_response() {
        let (base_url, _seen) = serve_once(200, r#"{"choices":[]}"#).await;

        let client = GroqClient::new(DEFAULT_MODEL, "gsk-test", &base_url).unwrap();
        let err = client.invoke(&messages()).await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse { .. }));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_request_error() {
        let client = GroqClient::new(DEFAULT_MODEL, "gsk-test", &closed_port_url().await).unwrap();
        let err = client.invoke(&messages()).await.unwrap_err();
        assert!(matches!(err, LlmError::Request { .. }));
        assert!(err.to_string().starts_with("Failed to send request to Groq"));
    }
}
