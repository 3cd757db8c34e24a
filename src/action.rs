use crossterm::event::{KeyCode, KeyModifiers};

#[derive(Debug)]
pub enum Action {
    Input { code: KeyCode, modifiers: KeyModifiers },
    ChainCompleted(Result<String, String>),
}
