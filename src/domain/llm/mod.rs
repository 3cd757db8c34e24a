//! Backend clients. Each one accepts rendered chat messages and returns a
//! single non-streamed completion.

pub mod groq;
pub mod ollama;

pub use groq::GroqClient;
pub use ollama::OllamaClient;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::types::{ChatMessage, ModelOutput};

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("{provider} API key is empty or missing")]
    MissingApiKey { provider: &'static str },
    #[error("{provider} model name is empty")]
    MissingModel { provider: &'static str },
    #[error("invalid {provider} base URL '{url}': {reason}")]
    InvalidBaseUrl {
        provider: &'static str,
        url: String,
        reason: String,
    },
    #[error("Failed to send request to {provider}: {source}")]
    Request {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{provider} API error ({status}): {message}")]
    Api {
        provider: &'static str,
        status: u16,
        message: String,
    },
    #[error("Failed to parse {provider} response: {reason}")]
    InvalidResponse {
        provider: &'static str,
        reason: String,
    },
    #[error("No content in {provider} response")]
    EmptyResponse { provider: &'static str },
}

/// Anything that can turn a rendered prompt into a completion
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Model identifier, for logs and the header
    fn name(&self) -> &str;

    async fn invoke(&self, messages: &[ChatMessage]) -> Result<ModelOutput, LlmError>;
}

#[async_trait]
impl<M: ChatModel + ?Sized> ChatModel for Box<M> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn invoke(&self, messages: &[ChatMessage]) -> Result<ModelOutput, LlmError> {
        (**self).invoke(messages).await
    }
}

fn require_model(provider: &'static str, model: &str) -> Result<String, LlmError> {
    let model = model.trim();
    if model.is_empty() {
        return Err(LlmError::MissingModel { provider });
    }
    Ok(model.to_string())
}

/// Parse and normalize a base URL (no trailing slash)
fn parse_base_url(provider: &'static str, url: &str) -> Result<String, LlmError> {
    let invalid = |reason: String| LlmError::InvalidBaseUrl {
        provider,
        url: url.to_string(),
        reason,
    };

    let parsed = reqwest::Url::parse(url.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
    }
    if parsed.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

/// Send a prepared request and decode a JSON body, mapping every failure to
/// an `LlmError` for `provider`
async fn send_json<T: DeserializeOwned>(
    provider: &'static str,
    request: reqwest::RequestBuilder,
) -> Result<T, LlmError> {
    let response = request
        .send()
        .await
        .map_err(|source| LlmError::Request { provider, source })?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|source| LlmError::Request { provider, source })?;

    if !status.is_success() {
        return Err(LlmError::Api {
            provider,
            status: status.as_u16(),
            message: extract_error_message(&body),
        });
    }

    serde_json::from_str(&body).map_err(|e| LlmError::InvalidResponse {
        provider,
        reason: e.to_string(),
    })
}

/// Pull a readable message out of an error body.
///
/// Handles `{"error": "..."}` (Ollama) and `{"error": {"message": "..."}}`
/// (OpenAI-compatible); anything else is returned trimmed.
fn extract_error_message(body: &str) -> String {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| match value.get("error")? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(obj) => {
                obj.get("message").and_then(|m| m.as_str()).map(str::to_string)
            }
            _ => None,
        });

    match message {
        Some(message) => message,
        None if body.trim().is_empty() => "empty response body".to_string(),
        None => body.trim().to_string(),
    }
}

#[cfg(test)]
pub(crate) mod test_server {
    //! One-shot HTTP server for exercising the clients without a real backend.

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    pub struct CapturedRequest {
        pub head: String,
        pub body: String,
    }

    /// Serve a single canned response; returns the base URL and a receiver
    /// for the request the server saw.
    pub async fn serve_once(
        status: u16,
        body: &'static str,
    ) -> (String, oneshot::Receiver<CapturedRequest>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let _ = tx.send(request);

            let response = format!(
                "HTTP/1.1 {} Test\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });

        (format!("http://{}", addr), rx)
    }

    /// Base URL of a port with nothing listening on it
    pub async fn closed_port_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> CapturedRequest {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        let header_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break buf.len();
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let content_length = head
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);

        while buf.len() < header_end + content_length {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }

        let body_end = (header_end + content_length).min(buf.len());
        let body = String::from_utf8_lossy(&buf[header_end..body_end]).to_string();
        CapturedRequest { head, body }
    }
}
