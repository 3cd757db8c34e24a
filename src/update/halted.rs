use crossterm::event::{KeyCode, KeyModifiers};

use crate::app::App;
use crate::command::Command;

pub fn handle_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Vec<Command> {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => {
            app.should_quit = true;
            Vec::new()
        }
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
            Vec::new()
        }
        _ => Vec::new(),
    }
}
