mod keymap;
mod state;
mod types;

pub use types::{App, ErrorDialog, InputMode, PromptKind};
