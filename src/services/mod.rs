//! Side-effect collaborators
//!
//! Notifications and haptics raised by the tick engine. All of them are
//! fire-and-forget: a failure is logged and never reaches the engine.

pub mod haptics;
pub mod notifier;
pub mod system;

// Re-export main types
pub use haptics::{BellHaptics, Haptics};
pub use notifier::{DesktopNotifier, LogNotifier, Notifier, SilentNotifier};
pub use system::{check_notify_send_available, select_notifier};
