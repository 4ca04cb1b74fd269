//! Shared application state handed to the HTTP layer

use std::{
    sync::Mutex,
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tracing::debug;

use crate::{events::TimerEvent, tasks::TimerHandle};

/// Most recent client command, shown by the status endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastAction {
    pub action: String,
    pub at: DateTime<Utc>,
}

/// Actor handle plus the server metadata reported by `/status`
#[derive(Debug)]
pub struct AppState {
    pub timers: TimerHandle,
    pub events_tx: broadcast::Sender<TimerEvent>,
    pub started: Instant,
    pub port: u16,
    pub host: String,
    last_action: Mutex<Option<LastAction>>,
}

impl AppState {
    pub fn new(
        port: u16,
        host: String,
        timers: TimerHandle,
        events_tx: broadcast::Sender<TimerEvent>,
    ) -> Self {
        Self {
            timers,
            events_tx,
            started: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
        }
    }

    pub fn record_action(&self, action: impl Into<String>) {
        let action = action.into();
        debug!("Action: {}", action);
        if let Ok(mut slot) = self.last_action.lock() {
            *slot = Some(LastAction {
                action,
                at: Utc::now(),
            });
        }
    }

    pub fn last_action(&self) -> Option<LastAction> {
        self.last_action.lock().ok().and_then(|slot| slot.clone())
    }

    /// Subscribe to halfway and completion events
    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.events_tx.subscribe()
    }

    pub fn uptime(&self) -> String {
        format_uptime(self.started.elapsed())
    }
}

/// Render as `1h 2m 3s`, dropping leading zero units
pub fn format_uptime(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    let (h, m, s) = (secs / 3600, secs % 3600 / 60, secs % 60);
    match (h, m) {
        (0, 0) => format!("{}s", s),
        (0, _) => format!("{}m {}s", m, s),
        _ => format!("{}h {}m {}s", h, m, s),
    }
}
