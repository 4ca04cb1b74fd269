//! One-second countdown step
//!
//! The countdown is count-based: each tick removes exactly one second from
//! every running timer, with no wall-clock reconciliation. Time spent with the
//! host asleep is therefore not counted and drift accumulates; this is a
//! known limitation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info};

use super::{recorder::HistoryRecorder, registry::TimerRegistry};
use crate::{
    events::TimerEvent,
    services::{Haptics, Notifier},
    state::{Timer, TimerStatus},
    storage::Store,
};

/// Next collection plus what happened on the way there
#[derive(Debug, Clone, Default)]
pub struct TickOutcome {
    pub timers: Vec<Timer>,
    /// Whether any timer differs from its previous value
    pub changed: bool,
    pub halfway: Vec<Timer>,
    /// Pre-decrement snapshots of timers that reached zero
    pub completed: Vec<Timer>,
}

/// Advance every running timer by one second without touching any collaborator
pub fn advance(timers: &[Timer]) -> TickOutcome {
    let mut outcome = TickOutcome {
        timers: Vec::with_capacity(timers.len()),
        ..TickOutcome::default()
    };

    for timer in timers {
        if timer.status != TimerStatus::Running || timer.remaining_time == 0 {
            outcome.timers.push(timer.clone());
            continue;
        }
        outcome.changed = true;

        let remaining = timer.remaining_time - 1;
        let mut halfway_alert_triggered = timer.halfway_alert_triggered;
        // remaining <= duration / 2 in exact arithmetic
        if timer.halfway_alert && !timer.halfway_alert_triggered && remaining * 2 <= timer.duration
        {
            halfway_alert_triggered = true;
            outcome.halfway.push(timer.clone());
        }

        if remaining == 0 {
            outcome.completed.push(timer.clone());
            outcome.timers.push(Timer {
                remaining_time: 0,
                status: TimerStatus::Completed,
                halfway_alert_triggered,
                ..timer.clone()
            });
        } else {
            outcome.timers.push(Timer {
                remaining_time: remaining,
                halfway_alert_triggered,
                ..timer.clone()
            });
        }
    }
    outcome
}

/// Drives [`advance`] against the registry and fires the tick's side effects
pub struct TickEngine {
    notifier: Arc<dyn Notifier>,
    haptics: Arc<dyn Haptics>,
}

impl TickEngine {
    pub fn new(notifier: Arc<dyn Notifier>, haptics: Arc<dyn Haptics>) -> Self {
        Self { notifier, haptics }
    }

    /// Run one tick. The new collection is swapped into the registry before
    /// any store write; it is persisted once, and only when something changed.
    pub async fn tick<S: Store>(
        &self,
        registry: &mut TimerRegistry<S>,
        recorder: &HistoryRecorder<S>,
    ) -> Vec<TimerEvent> {
        self.tick_at(registry, recorder, Utc::now()).await
    }

    pub async fn tick_at<S: Store>(
        &self,
        registry: &mut TimerRegistry<S>,
        recorder: &HistoryRecorder<S>,
        now: DateTime<Utc>,
    ) -> Vec<TimerEvent> {
        let outcome = advance(registry.timers());
        if !outcome.changed {
            return Vec::new();
        }

        let mut events = Vec::with_capacity(outcome.halfway.len() + outcome.completed.len());

        for timer in &outcome.halfway {
            debug!("Halfway reached for '{}'", timer.name);
            self.notifier
                .notify("Halfway Alert", &format!("{} is halfway complete!", timer.name));
            events.push(TimerEvent::HalfwayReached {
                id: timer.id.clone(),
                name: timer.name.clone(),
                remaining_time: timer.remaining_time - 1,
                at: now,
            });
        }

        let persisted = registry.commit(outcome.timers).await;
        if let Err(e) = persisted {
            error!("Tick state not persisted: {}", e);
        }

        for timer in &outcome.completed {
            info!("Timer '{}' completed", timer.name);
            if let Err(e) = recorder.record(timer, now).await {
                error!("Failed to record '{}' to history: {}", timer.name, e);
            }
            self.haptics.vibrate();
            self.notifier
                .notify("Timer Complete", &format!("{} has finished!", timer.name));
            events.push(TimerEvent::Completed {
                id: timer.id.clone(),
                name: timer.name.clone(),
                category: timer.category.clone(),
                at: now,
            });
        }

        events
    }
}
