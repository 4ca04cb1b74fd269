//! Durable completion history

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::{
    error::StoreError,
    state::{HistoryItem, Timer},
    storage::{Store, HISTORY_KEY},
};

/// Appends completion snapshots to the `timerHistory` log, newest first
#[derive(Debug)]
pub struct HistoryRecorder<S> {
    store: Arc<S>,
}

impl<S: Store> HistoryRecorder<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Prepend an entry for `timer` and persist the full log
    pub async fn record(
        &self,
        timer: &Timer,
        completed_at: DateTime<Utc>,
    ) -> Result<HistoryItem, StoreError> {
        // An unreadable log must not be replaced by a one-entry log.
        let existing = self.read_log().await?;

        let item = HistoryItem::from_timer(timer, completed_at);
        let mut log = Vec::with_capacity(existing.len() + 1);
        log.push(item.clone());
        log.extend(existing);

        self.save(&log).await?;
        info!("Recorded completion of '{}' ({} entries)", timer.name, log.len());
        Ok(item)
    }

    /// The persisted log, or empty when absent, corrupt or unreadable
    pub async fn load_all(&self) -> Vec<HistoryItem> {
        match self.read_log().await {
            Ok(log) => log,
            Err(e) => {
                warn!("Failed to load history: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn clear(&self) -> Result<(), StoreError> {
        info!("Clearing timer history");
        self.save(&[]).await
    }

    /// History as a pretty-printed JSON array
    pub async fn export(&self) -> Result<String, StoreError> {
        let log = self.load_all().await;
        serde_json::to_string_pretty(&log).map_err(|source| StoreError::Encode {
            key: HISTORY_KEY.to_string(),
            source,
        })
    }

    async fn read_log(&self) -> Result<Vec<HistoryItem>, StoreError> {
        let Some(raw) = self.store.read(HISTORY_KEY).await? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(log) => Ok(log),
            Err(e) => {
                warn!("Stored history is corrupt, treating as empty: {}", e);
                Ok(Vec::new())
            }
        }
    }

    async fn save(&self, log: &[HistoryItem]) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(log).map_err(|source| StoreError::Encode {
            key: HISTORY_KEY.to_string(),
            source,
        })?;
        if let Err(e) = self.store.write(HISTORY_KEY, encoded).await {
            error!("Failed to save history: {}", e);
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{state::NewTimer, storage::MemoryStore};
    use pretty_assertions::assert_eq;

    fn timer(name: &str) -> Timer {
        Timer::create(
            NewTimer {
                name: name.to_string(),
                category: "Kitchen".to_string(),
                duration: 5,
                halfway_alert: false,
            },
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn record_prepends_newest_first() {
        let recorder = HistoryRecorder::new(Arc::new(MemoryStore::new()));
        recorder.record(&timer("Tea"), Utc::now()).await.unwrap();
        recorder.record(&timer("Eggs"), Utc::now()).await.unwrap();

        let names: Vec<String> = recorder
            .load_all()
            .await
            .into_iter()
            .map(|item| item.name)
            .collect();
        assert_eq!(names, vec!["Eggs".to_string(), "Tea".to_string()]);
    }

    #[tokio::test]
    async fn clear_leaves_empty_array() {
        let store = Arc::new(MemoryStore::new());
        let recorder = HistoryRecorder::new(Arc::clone(&store));
        recorder.record(&timer("Tea"), Utc::now()).await.unwrap();

        recorder.clear().await.unwrap();
        assert!(recorder.load_all().await.is_empty());
        assert_eq!(store.read(HISTORY_KEY).await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn corrupt_log_loads_empty() {
        let store = Arc::new(MemoryStore::new());
        store.write(HISTORY_KEY, "oops".to_string()).await.unwrap();
        let recorder = HistoryRecorder::new(store);
        assert!(recorder.load_all().await.is_empty());
    }

    #[tokio::test]
    async fn export_is_pretty_json_array() {
        let recorder = HistoryRecorder::new(Arc::new(MemoryStore::new()));
        let tea = timer("Tea");
        let item = recorder.record(&tea, Utc::now()).await.unwrap();

        let exported = recorder.export().await.unwrap();
        assert!(exported.starts_with("[\n"));
        let decoded: Vec<HistoryItem> = serde_json::from_str(&exported).unwrap();
        assert_eq!(decoded, vec![item]);
        assert_eq!(decoded[0].id, tea.id);
    }

    #[tokio::test]
    async fn empty_export_is_empty_array() {
        let recorder = HistoryRecorder::new(Arc::new(MemoryStore::new()));
        assert_eq!(recorder.export().await.unwrap(), "[]");
    }
}
