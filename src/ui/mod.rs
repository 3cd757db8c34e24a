mod components;
mod layout;

pub use layout::{output_width, render};
