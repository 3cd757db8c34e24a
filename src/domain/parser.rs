use thiserror::Error;

use super::types::ModelOutput;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Model refused request (finish reason: {0})")]
    Refused(String),
}

/// Turns a raw model completion into the value the caller wants
pub trait OutputParser: Send + Sync {
    type Output;

    fn parse(&self, output: ModelOutput) -> Result<Self::Output, ParseError>;
}

/// Passes the completion text through as-is
#[derive(Debug, Clone, Copy, Default)]
pub struct StrOutputParser;

impl OutputParser for StrOutputParser {
    type Output = String;

    fn parse(&self, output: ModelOutput) -> Result<String, ParseError> {
        match output.finish_reason.as_deref() {
            Some(reason @ "content_filter") if output.content.is_empty() => {
                Err(ParseError::Refused(reason.to_string()))
            }
            _ => Ok(output.content),
        }
    }
}
