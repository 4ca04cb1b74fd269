//! Background tasks module
//!
//! The timer actor that owns all timer state, and the optional completion
//! policy that reacts to its events.

pub mod completion_policy;
pub mod handle;
pub mod timer_actor;

// Re-export main types
pub use completion_policy::completion_policy_task;
pub use handle::{Command, Target, TimerHandle};
pub use timer_actor::{timer_actor_task, TimerActor, TICK_PERIOD};
