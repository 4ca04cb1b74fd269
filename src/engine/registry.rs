//! Authoritative timer collection with persist-on-write

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use super::category::{category_views, group_by_category, CategoryGroup, CategoryView, Expansion};
use crate::{
    error::StoreError,
    state::{NewTimer, Timer, Transition},
    storage::{Store, TIMERS_KEY},
};

/// Owns the timer collection and the category expansion set.
///
/// Every mutation builds a new collection, swaps it in, then writes the whole
/// collection to the store once. The in-memory swap stands even when the
/// write fails; the failure is returned for the caller to report.
#[derive(Debug)]
pub struct TimerRegistry<S> {
    store: Arc<S>,
    timers: Vec<Timer>,
    expansion: Expansion,
}

impl<S: Store> TimerRegistry<S> {
    /// Load the persisted collection. Missing, unreadable or corrupt data yields an empty registry.
    pub async fn load(store: Arc<S>) -> Self {
        let timers = match store.read(TIMERS_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Timer>>(&raw) {
                Ok(timers) => timers,
                Err(e) => {
                    warn!("Stored timers are corrupt, starting empty: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to read stored timers, starting empty: {}", e);
                Vec::new()
            }
        };

        info!("Loaded {} timers", timers.len());
        Self {
            store,
            timers,
            expansion: Expansion::new(),
        }
    }

    pub fn timers(&self) -> &[Timer] {
        &self.timers
    }

    pub fn get(&self, id: &str) -> Option<&Timer> {
        self.timers.iter().find(|t| t.id == id)
    }

    pub fn groups(&self) -> Vec<CategoryGroup> {
        group_by_category(&self.timers)
    }

    pub fn category_views(&self) -> Vec<CategoryView> {
        category_views(&self.timers, &self.expansion)
    }

    pub fn expansion(&self) -> &Expansion {
        &self.expansion
    }

    pub fn toggle_expansion(&mut self, category: &str) -> bool {
        self.expansion.toggle(category)
    }

    pub async fn add(&mut self, spec: NewTimer) -> Result<Timer, StoreError> {
        let timer = Timer::create(spec, Utc::now());
        info!("Adding timer '{}' ({}s) in {}", timer.name, timer.duration, timer.category);

        let mut next = self.timers.clone();
        next.push(timer.clone());
        self.expansion.expand(timer.category_key());
        self.commit(next).await?;
        Ok(timer)
    }

    pub async fn start(&mut self, id: &str) -> Result<(), StoreError> {
        self.transition(|t| t.id == id, Transition::Start).await
    }

    pub async fn pause(&mut self, id: &str) -> Result<(), StoreError> {
        self.transition(|t| t.id == id, Transition::Pause).await
    }

    pub async fn reset(&mut self, id: &str) -> Result<(), StoreError> {
        self.transition(|t| t.id == id, Transition::Reset).await
    }

    pub async fn remove(&mut self, id: &str) -> Result<(), StoreError> {
        if self.get(id).is_none() {
            debug!("Remove ignored, no timer {}", id);
            return Ok(());
        }
        info!("Removing timer {}", id);
        let next = self.timers.iter().filter(|t| t.id != id).cloned().collect();
        self.commit(next).await
    }

    pub async fn start_all_in_category(&mut self, category: &str) -> Result<(), StoreError> {
        self.transition(|t| t.in_category(category), Transition::Start)
            .await
    }

    pub async fn pause_all_in_category(&mut self, category: &str) -> Result<(), StoreError> {
        self.transition(|t| t.in_category(category), Transition::Pause)
            .await
    }

    pub async fn reset_all_in_category(&mut self, category: &str) -> Result<(), StoreError> {
        self.transition(|t| t.in_category(category), Transition::Reset)
            .await
    }

    /// Apply one transition to every selected timer as a single write
    pub async fn transition<F>(&mut self, selects: F, transition: Transition) -> Result<(), StoreError>
    where
        F: Fn(&Timer) -> bool,
    {
        let mut matched = 0usize;
        let next: Vec<Timer> = self
            .timers
            .iter()
            .map(|t| {
                if selects(t) {
                    matched += 1;
                    t.apply(transition)
                } else {
                    t.clone()
                }
            })
            .collect();

        if matched == 0 {
            debug!("{:?} matched no timers", transition);
            return Ok(());
        }
        debug!("{:?} applied to {} timers", transition, matched);
        self.commit(next).await
    }

    /// Swap in a new collection and persist it
    pub async fn commit(&mut self, timers: Vec<Timer>) -> Result<(), StoreError> {
        self.timers = timers;
        self.persist().await
    }

    async fn persist(&self) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(&self.timers).map_err(|source| StoreError::Encode {
            key: TIMERS_KEY.to_string(),
            source,
        })?;

        if let Err(e) = self.store.write(TIMERS_KEY, encoded).await {
            error!("Failed to save timers: {}", e);
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{state::TimerStatus, storage::MemoryStore};
    use pretty_assertions::assert_eq;

    fn spec(name: &str, category: &str, duration: u64) -> NewTimer {
        NewTimer {
            name: name.to_string(),
            category: category.to_string(),
            duration,
            halfway_alert: false,
        }
    }

    async fn registry() -> (Arc<MemoryStore>, TimerRegistry<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let registry = TimerRegistry::load(Arc::clone(&store)).await;
        (store, registry)
    }

    #[tokio::test]
    async fn load_without_data_is_empty() {
        let (_, registry) = registry().await;
        assert!(registry.timers().is_empty());
    }

    #[tokio::test]
    async fn load_with_corrupt_data_is_empty() {
        let store = Arc::new(MemoryStore::new());
        store
            .write(TIMERS_KEY, "{not json".to_string())
            .await
            .unwrap();

        let registry = TimerRegistry::load(store).await;
        assert!(registry.timers().is_empty());
    }

    #[tokio::test]
    async fn add_persists_and_expands_category() {
        let (store, mut registry) = registry().await;
        let timer = registry.add(spec("Tea", "Kitchen", 5)).await.unwrap();

        assert_eq!(timer.status, TimerStatus::Idle);
        assert!(registry.expansion().is_expanded("Kitchen"));

        let raw = store.read(TIMERS_KEY).await.unwrap().unwrap();
        let stored: Vec<Timer> = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored, vec![timer]);
    }

    #[tokio::test]
    async fn reload_restores_collection() {
        let (store, mut registry) = registry().await;
        registry.add(spec("Tea", "Kitchen", 5)).await.unwrap();
        registry.add(spec("Plank", "Fitness", 60)).await.unwrap();

        let reloaded = TimerRegistry::load(store).await;
        assert_eq!(reloaded.timers(), registry.timers());
    }

    #[tokio::test]
    async fn single_transitions_follow_status_rules() {
        let (_, mut registry) = registry().await;
        let id = registry.add(spec("Tea", "Kitchen", 5)).await.unwrap().id;

        registry.pause(&id).await.unwrap();
        assert_eq!(registry.get(&id).unwrap().status, TimerStatus::Idle);

        registry.start(&id).await.unwrap();
        assert_eq!(registry.get(&id).unwrap().status, TimerStatus::Running);

        registry.pause(&id).await.unwrap();
        assert_eq!(registry.get(&id).unwrap().status, TimerStatus::Paused);

        registry.reset(&id).await.unwrap();
        assert_eq!(registry.get(&id).unwrap().status, TimerStatus::Idle);
    }

    #[tokio::test]
    async fn unknown_id_is_a_silent_noop() {
        let (store, mut registry) = registry().await;
        registry.add(spec("Tea", "Kitchen", 5)).await.unwrap();
        let before = registry.timers().to_vec();
        let writes = store.write_count();

        registry.remove("missing").await.unwrap();
        registry.start("missing").await.unwrap();

        assert_eq!(registry.timers(), before.as_slice());
        assert_eq!(store.write_count(), writes);
    }

    #[tokio::test]
    async fn remove_deletes_only_that_timer() {
        let (_, mut registry) = registry().await;
        let tea = registry.add(spec("Tea", "Kitchen", 5)).await.unwrap();
        let eggs = registry.add(spec("Eggs", "Kitchen", 9)).await.unwrap();

        registry.remove(&tea.id).await.unwrap();
        assert_eq!(registry.timers(), &[eggs]);
    }

    #[tokio::test]
    async fn bulk_operation_is_one_write_and_scoped_to_category() {
        let (store, mut registry) = registry().await;
        let a = registry.add(spec("Plank", "Fitness", 60)).await.unwrap();
        let b = registry.add(spec("Run", " Fitness", 600)).await.unwrap();
        let other = registry.add(spec("Tea", "Kitchen", 5)).await.unwrap();
        let writes = store.write_count();

        registry.start_all_in_category("Fitness").await.unwrap();

        assert_eq!(store.write_count(), writes + 1);
        assert_eq!(registry.get(&a.id).unwrap().status, TimerStatus::Running);
        assert_eq!(registry.get(&b.id).unwrap().status, TimerStatus::Running);
        assert_eq!(registry.get(&other.id).unwrap(), &other);
    }

    #[tokio::test]
    async fn failed_write_is_surfaced_but_state_stands() {
        let (store, mut registry) = registry().await;
        let id = registry.add(spec("Tea", "Kitchen", 5)).await.unwrap().id;

        store.set_fail_writes(true);
        let result = registry.start(&id).await;

        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        assert_eq!(registry.get(&id).unwrap().status, TimerStatus::Running);
    }
}
