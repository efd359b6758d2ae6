//! Remote file browser: current path, rows, checkboxes, and the download batch.

pub mod path;
mod selection;
mod state;
pub mod transfer;

pub use selection::SelectionState;
pub use state::BrowserSession;
