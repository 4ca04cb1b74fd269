use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Observable outcomes of a tick.
///
/// The engine only reports these; reacting to them (alerts, auto-removal) is
/// left to subscribers of the actor's event channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TimerEvent {
    HalfwayReached {
        id: String,
        name: String,
        remaining_time: u64,
        at: DateTime<Utc>,
    },
    Completed {
        id: String,
        name: String,
        category: String,
        at: DateTime<Utc>,
    },
}
