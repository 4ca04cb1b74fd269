//! Volatile in-process store

use std::{
    collections::HashMap,
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};
use tokio::sync::Mutex;

use super::Store;
use crate::error::StoreError;

/// HashMap-backed store, used for `--in-memory` runs and tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write, remove and clear fail until switched off
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful writes so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes disabled".to_string()));
        }
        Ok(())
    }
}

impl Store for MemoryStore {
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn write(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.check_writable()?;
        self.entries.lock().await.insert(key.to_string(), value);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.check_writable()?;
        self.entries.lock().await.remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.check_writable()?;
        self.entries.lock().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn read_write_remove_clear() {
        let store = MemoryStore::new();
        assert_eq!(store.read("a").await.unwrap(), None);

        store.write("a", "1".to_string()).await.unwrap();
        store.write("b", "2".to_string()).await.unwrap();
        assert_eq!(store.read("a").await.unwrap().as_deref(), Some("1"));
        assert_eq!(store.write_count(), 2);

        store.remove("a").await.unwrap();
        assert_eq!(store.read("a").await.unwrap(), None);

        store.clear().await.unwrap();
        assert_eq!(store.read("b").await.unwrap(), None);
    }

    #[tokio::test]
    async fn injected_failures_reject_writes() {
        let store = MemoryStore::new();
        store.set_fail_writes(true);
        assert!(matches!(
            store.write("a", "1".to_string()).await,
            Err(StoreError::Unavailable(_))
        ));
        assert_eq!(store.read("a").await.unwrap(), None);

        store.set_fail_writes(false);
        store.write("a", "1".to_string()).await.unwrap();
    }
}
