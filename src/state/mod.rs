//! State management module
//!
//! Timer and history records, plus the shared application state handed to
//! the HTTP layer.

pub mod app_state;
pub mod history;
pub mod timer;

// Re-export main types
pub use app_state::AppState;
pub use history::HistoryItem;
pub use timer::{NewTimer, Timer, TimerSpec, TimerStatus, Transition};
