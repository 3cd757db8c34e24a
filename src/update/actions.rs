use tracing::debug;

use crate::app::{App, Outcome};
use crate::command::Command;

pub fn handle_chain_completed(app: &mut App, result: Result<String, String>) -> Vec<Command> {
    match result {
        Ok(text) => {
            debug!(chars = text.chars().count(), "response received");
            app.finish(Outcome::Response(text));
        }
        Err(err) => app.finish(Outcome::Failed(err)),
    }
    Vec::new()
}
