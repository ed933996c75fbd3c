//! Core trait definitions

mod console;
mod prompt;

pub use console::Console;
pub use prompt::{answer_is_yes, Prompt};
