//! Completed-run history entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Timer;

/// Write-once record of a timer reaching zero.
///
/// `id` is the source timer's id and may repeat across entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: String,
    pub name: String,
    pub category: String,
    pub duration: u64,
    pub completed_at: DateTime<Utc>,
}

impl HistoryItem {
    pub fn from_timer(timer: &Timer, completed_at: DateTime<Utc>) -> Self {
        Self {
            id: timer.id.clone(),
            name: timer.name.clone(),
            category: timer.category.clone(),
            duration: timer.duration,
            completed_at,
        }
    }
}
