//! Host capability probes

use std::sync::Arc;

use tokio::process::Command;
use tracing::{info, warn};

use super::{DesktopNotifier, LogNotifier, Notifier, SilentNotifier};

/// Check if notify-send is available on the system
pub async fn check_notify_send_available() -> Result<(), String> {
    Command::new("notify-send")
        .arg("--version")
        .output()
        .await
        .map_err(|_| "notify-send is not available, notifications go to the log".to_string())?;

    info!("notify-send is available");
    Ok(())
}

/// Pick the notifier for this host: desktop when possible, log otherwise
pub async fn select_notifier(enabled: bool) -> Arc<dyn Notifier> {
    if !enabled {
        info!("Notifications disabled");
        return Arc::new(SilentNotifier);
    }
    match check_notify_send_available().await {
        Ok(()) => Arc::new(DesktopNotifier),
        Err(e) => {
            warn!("{}", e);
            Arc::new(LogNotifier)
        }
    }
}
