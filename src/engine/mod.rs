//! Timer lifecycle engine
//!
//! - [`TimerRegistry`]: the canonical collection, persisted on every mutation
//! - [`TickEngine`]: per-second countdown with halfway and completion effects
//! - [`HistoryRecorder`]: most-recent-first log of completed runs
//! - [`category`]: grouping by trimmed category and expansion state

pub mod category;
pub mod recorder;
pub mod registry;
pub mod tick;

pub use category::{category_views, group_by_category, CategoryGroup, CategoryView, Expansion};
pub use recorder::HistoryRecorder;
pub use registry::TimerRegistry;
pub use tick::{advance, TickEngine, TickOutcome};
