use std::collections::HashMap;
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info, info_span, warn, Instrument};

use super::llm::{ChatModel, LlmError};
use super::parser::{OutputParser, ParseError};
use super::prompt::{PromptError, PromptTemplate, QUESTION_VAR};

#[derive(Debug, Error)]
pub enum ChainError {
    #[error(transparent)]
    Prompt(#[from] PromptError),
    #[error(transparent)]
    Model(#[from] LlmError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Where chain runs are reported
#[derive(Debug, Clone, Default)]
pub struct TraceSettings {
    pub project: String,
    /// Log prompts and responses, not just timings
    pub enabled: bool,
}

/// template → model → parser, run once per question
pub struct Chain<M, P> {
    template: PromptTemplate,
    model: M,
    parser: P,
    trace: TraceSettings,
}

impl<M, P> Chain<M, P>
where
    M: ChatModel,
    P: OutputParser,
{
    pub fn new(template: PromptTemplate, model: M, parser: P) -> Self {
        Self {
            template,
            model,
            parser,
            trace: TraceSettings::default(),
        }
    }

    pub fn with_trace(mut self, trace: TraceSettings) -> Self {
        self.trace = trace;
        self
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub async fn invoke(&self, question: &str) -> Result<P::Output, ChainError> {
        let span = info_span!(
            "chain.invoke",
            project = %self.trace.project,
            model = %self.model.name(),
        );

        async {
            let started = Instant::now();
            let vars = HashMap::from([(QUESTION_VAR, question)]);
            let messages = self.template.render(&vars)?;

            if self.trace.enabled {
                for message in &messages {
                    info!(role = message.role.as_str(), content = %message.content, "prompt message");
                }
            }

            let output = match self.model.invoke(&messages).await {
                Ok(output) => output,
                Err(e) => {
                    warn!(error = %e, elapsed_ms = started.elapsed().as_millis() as u64, "model call failed");
                    return Err(ChainError::from(e));
                }
            };

            if self.trace.enabled {
                info!(
                    model = %output.model,
                    finish_reason = output.finish_reason.as_deref().unwrap_or("-"),
                    content = %output.content,
                    "model output"
                );
            }

            let parsed = self.parser.parse(output)?;
            debug!(elapsed_ms = started.elapsed().as_millis() as u64, "chain finished");
            Ok::<_, ChainError>(parsed)
        }
        .instrument(span)
        .await
    }
}
