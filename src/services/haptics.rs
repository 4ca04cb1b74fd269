//! Completion haptics

use std::io::Write;

use tracing::debug;

/// Best-effort physical alert
pub trait Haptics: Send + Sync {
    fn vibrate(&self);
}

/// Rings the terminal bell; the daemon's stand-in for a device vibration
#[derive(Debug, Clone)]
pub struct BellHaptics {
    enabled: bool,
}

impl BellHaptics {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Haptics for BellHaptics {
    fn vibrate(&self) {
        if !self.enabled {
            return;
        }
        let mut stdout = std::io::stdout();
        if let Err(e) = stdout.write_all(b"\x07").and_then(|_| stdout.flush()) {
            debug!("Bell failed: {}", e);
        }
    }
}
