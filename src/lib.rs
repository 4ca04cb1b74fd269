//! Multi Timer - a categorized multi-timer daemon
//!
//! Named countdown timers grouped by category, many running at once, with a
//! one-time halfway alert and a durable history of completed runs. A single
//! actor task owns every timer; an HTTP API sends it commands.

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod services;
pub mod state;
pub mod storage;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use engine::{HistoryRecorder, TickEngine, TimerRegistry};
pub use error::{EngineError, StoreError, ValidationErrors};
pub use events::TimerEvent;
pub use state::{AppState, HistoryItem, Timer, TimerSpec, TimerStatus};
pub use storage::{FileStore, MemoryStore, Store};
pub use tasks::{TimerActor, TimerHandle};
pub use utils::signals::shutdown_signal;
