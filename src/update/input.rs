use crossterm::event::{KeyCode, KeyModifiers};

use crate::app::App;
use crate::command::Command;

pub fn handle_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Vec<Command> {
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
            Vec::new()
        }
        KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.clear_input();
            Vec::new()
        }
        KeyCode::Esc => {
            app.should_quit = true;
            Vec::new()
        }
        KeyCode::Enter => match app.submit() {
            Some(question) => vec![Command::RunChain { question }],
            None => Vec::new(),
        },
        KeyCode::Backspace => {
            app.delete_char();
            Vec::new()
        }
        KeyCode::Delete => {
            app.delete_char_forward();
            Vec::new()
        }
        KeyCode::Left => {
            app.cursor_left();
            Vec::new()
        }
        KeyCode::Right => {
            app.cursor_right();
            Vec::new()
        }
        KeyCode::Home => {
            app.cursor_home();
            Vec::new()
        }
        KeyCode::End => {
            app.cursor_end();
            Vec::new()
        }
        KeyCode::PageDown | KeyCode::Down => {
            app.scroll_down(if code == KeyCode::Down { 1 } else { 10 });
            Vec::new()
        }
        KeyCode::PageUp | KeyCode::Up => {
            app.scroll_up(if code == KeyCode::Up { 1 } else { 10 });
            Vec::new()
        }
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
            app.insert_char(c);
            Vec::new()
        }
        _ => Vec::new(),
    }
}
