mod actions;
mod halted;
mod input;
mod loading;

use crate::action::Action;
use crate::app::{App, AppState};
use crate::command::Command;

pub fn update(app: &mut App, action: Action) -> Vec<Command> {
    match action {
        Action::Input { code, modifiers } => match &app.state {
            AppState::Idle => input::handle_input(app, code, modifiers),
            AppState::AwaitingResult => loading::handle_input(app, code, modifiers),
            AppState::Halted(_) => halted::handle_input(app, code, modifiers),
        },
        Action::ChainCompleted(result) => actions::handle_chain_completed(app, result),
    }
}
