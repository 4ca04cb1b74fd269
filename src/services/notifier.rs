//! Best-effort user notifications

use tokio::process::Command;
use tracing::{debug, info, warn};

/// Fire-and-forget notification sink.
///
/// Implementations must return immediately and never report failure to the
/// caller; a lost notification is logged, not propagated.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, message: &str);
}

/// Desktop notifications through `notify-send`
#[derive(Debug, Clone, Default)]
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, message: &str) {
        let title = title.to_string();
        let message = message.to_string();

        tokio::spawn(async move {
            debug!("Sending desktop notification: {}", title);
            match Command::new("notify-send")
                .args([title.as_str(), message.as_str()])
                .output()
                .await
            {
                Ok(output) if output.status.success() => {}
                Ok(output) => {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    warn!("notify-send failed: {}", stderr.trim());
                }
                Err(e) => warn!("Failed to execute notify-send: {}", e),
            }
        });
    }
}

/// Notifications written to the log only
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, message: &str) {
        info!("{}: {}", title, message);
    }
}

/// Notifications switched off by configuration
#[derive(Debug, Clone, Default)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, title: &str, _message: &str) {
        debug!("Notification suppressed: {}", title);
    }
}
