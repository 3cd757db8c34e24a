pub mod error;
pub mod header;
pub mod input;
pub mod keybindings;
pub mod loading;
pub mod response;
