use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{parse_base_url, require_model, send_json, ChatModel, LlmError};
use crate::domain::types::{ChatMessage, ModelOutput};

const PROVIDER: &str = "Ollama";

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "gemma:2b";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    message: Option<ResponseMessage>,
    #[serde(default)]
    done_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}

/// A model served by a local (or tunnelled) Ollama instance
#[derive(Debug)]
pub struct OllamaClient {
    http: reqwest::Client,
    model: String,
    endpoint: String,
}

impl OllamaClient {
    pub fn new(model: &str, base_url: &str) -> Result<Self, LlmError> {
        let model = require_model(PROVIDER, model)?;
        let base_url = parse_base_url(PROVIDER, base_url)?;

        Ok(Self {
            http: reqwest::Client::new(),
            model,
            endpoint: format!("{}/api/chat", base_url),
        })
    }
}

#[async_trait]
impl ChatModel for OllamaClient {
    fn name(&self) -> &str {
        &self.model
    }

    async fn invoke(&self, messages: &[ChatMessage]) -> Result<ModelOutput, LlmError> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            stream: false,
        };

        let response: ChatResponse =
            send_json(PROVIDER, self.http.post(&self.endpoint).json(&request)).await?;

        let message = response
            .message
            .ok_or(LlmError::EmptyResponse { provider: PROVIDER })?;

        Ok(ModelOutput {
            content: message.content,
            model: response.model.unwrap_or_else(|| self.model.clone()),
            finish_reason: response.done_reason,
        })
    }
}
