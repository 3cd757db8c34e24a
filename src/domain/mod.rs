pub mod chain;
pub mod llm;
pub mod parser;
pub mod prompt;
pub mod types;

use tracing::debug;

use crate::config::{AppConfig, BackendConfig};

use chain::{Chain, ChainError};
use llm::{ChatModel, GroqClient, LlmError, OllamaClient};
use parser::StrOutputParser;
use prompt::PromptTemplate;

/// The chain the app runs: any backend, plain-text output
pub type RelayChain = Chain<Box<dyn ChatModel>, StrOutputParser>;

/// Construct the backend client described by `config`
pub fn build_model(backend: &BackendConfig) -> Result<Box<dyn ChatModel>, LlmError> {
    let model: Box<dyn ChatModel> = match backend {
        BackendConfig::Groq {
            api_key,
            model,
            base_url,
        } => Box::new(GroqClient::new(model, api_key, base_url)?),
        BackendConfig::Ollama { model, base_url } => Box::new(OllamaClient::new(model, base_url)?),
    };
    Ok(model)
}

/// Wire template, backend client and parser for `config`
pub fn build_chain(config: &AppConfig) -> Result<RelayChain, ChainError> {
    let template = PromptTemplate::question_answering(config.kind().system_instruction())?;
    debug!(variables = ?template.input_variables(), "prompt template ready");
    let model = build_model(&config.backend)?;
    Ok(Chain::new(template, model, StrOutputParser).with_trace(config.trace.clone()))
}
