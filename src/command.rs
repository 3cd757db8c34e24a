use tracing::{info, warn};

use crate::action::Action;
use crate::domain::chain::Chain;
use crate::domain::llm::ChatModel;
use crate::domain::parser::StrOutputParser;

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    RunChain { question: String },
}

pub async fn execute_command<M: ChatModel>(
    command: Command,
    chain: &Chain<M, StrOutputParser>,
) -> Option<Action> {
    match command {
        Command::RunChain { question } => {
            info!(chars = question.chars().count(), "running chain");
            let result = chain.invoke(&question).await.map_err(|e| {
                warn!(error = %e, "chain failed");
                e.to_string()
            });
            Some(Action::ChainCompleted(result))
        }
    }
}
