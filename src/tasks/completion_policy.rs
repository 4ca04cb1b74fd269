//! Auto-removal of completed timers
//!
//! The engine only marks timers completed. Removing them afterwards is a
//! policy choice made by this optional subscriber.

use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, warn};

use super::handle::TimerHandle;
use crate::{error::EngineError, events::TimerEvent};

/// Background task that removes each timer once its completion is published
pub async fn completion_policy_task(handle: TimerHandle, mut events: broadcast::Receiver<TimerEvent>) {
    info!("Starting completion policy task: completed timers are removed");

    loop {
        match events.recv().await {
            Ok(TimerEvent::Completed { id, name, .. }) => {
                info!("Removing completed timer '{}'", name);
                match handle.remove(&id).await {
                    Ok(()) => {}
                    Err(EngineError::Stopped) => break,
                    Err(e) => warn!("Failed to remove completed timer '{}': {}", name, e),
                }
            }
            Ok(_) => {}
            Err(RecvError::Lagged(missed)) => {
                warn!("Completion policy missed {} events", missed);
            }
            Err(RecvError::Closed) => break,
        }
    }

    info!("Completion policy task stopped");
}
