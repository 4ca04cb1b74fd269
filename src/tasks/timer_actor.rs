//! Timer actor background task
//!
//! One task owns the registry, the history recorder and the tick engine.
//! Commands and ticks are multiplexed through a single `select!`, so each one
//! finishes its read-modify-write cycle before the next is looked at.

use std::{ops::ControlFlow, sync::Arc, time::Duration};
use tokio::{
    sync::{broadcast, mpsc},
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, info};

use super::handle::{Command, Target, TimerHandle};
use crate::{
    engine::{HistoryRecorder, TickEngine, TimerRegistry},
    error::StoreError,
    events::TimerEvent,
    state::Transition,
    storage::Store,
};

/// Countdown period
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

const COMMAND_BUFFER: usize = 64;

/// Single owner of all timer state
pub struct TimerActor<S> {
    registry: TimerRegistry<S>,
    recorder: HistoryRecorder<S>,
    ticker: TickEngine,
    events_tx: broadcast::Sender<TimerEvent>,
}

impl<S: Store> TimerActor<S> {
    /// Load persisted timers from `store` and prepare the actor
    pub async fn load(
        store: Arc<S>,
        ticker: TickEngine,
        events_tx: broadcast::Sender<TimerEvent>,
    ) -> Self {
        let registry = TimerRegistry::load(Arc::clone(&store)).await;
        let recorder = HistoryRecorder::new(store);
        Self {
            registry,
            recorder,
            ticker,
            events_tx,
        }
    }

    pub fn registry(&self) -> &TimerRegistry<S> {
        &self.registry
    }

    /// Run one countdown step and publish its events
    pub async fn tick(&mut self) -> Vec<TimerEvent> {
        let events = self.ticker.tick(&mut self.registry, &self.recorder).await;
        for event in &events {
            // No subscribers is fine
            let _ = self.events_tx.send(event.clone());
        }
        events
    }

    /// Serve one command. Breaks once the actor has been asked to stop.
    pub async fn handle(&mut self, command: Command) -> ControlFlow<()> {
        match command {
            Command::List { reply } => {
                let _ = reply.send(self.registry.timers().to_vec());
            }
            Command::Add { timer, reply } => {
                let _ = reply.send(self.registry.add(timer).await);
            }
            Command::Transition {
                target,
                transition,
                reply,
            } => {
                let result = self.apply(target, transition).await;
                let _ = reply.send(result);
            }
            Command::Remove { id, reply } => {
                let _ = reply.send(self.registry.remove(&id).await);
            }
            Command::Categories { reply } => {
                let _ = reply.send(self.registry.category_views());
            }
            Command::ToggleCategory { category, reply } => {
                let expanded = self.registry.toggle_expansion(&category);
                debug!("Category '{}' expanded: {}", category.trim(), expanded);
                let _ = reply.send(expanded);
            }
            Command::History { reply } => {
                let _ = reply.send(self.recorder.load_all().await);
            }
            Command::ClearHistory { reply } => {
                let _ = reply.send(self.recorder.clear().await);
            }
            Command::ExportHistory { reply } => {
                let _ = reply.send(self.recorder.export().await);
            }
            Command::Shutdown => {
                info!("Timer actor shutting down");
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    async fn apply(&mut self, target: Target, transition: Transition) -> Result<(), StoreError> {
        match (target, transition) {
            (Target::Timer(id), Transition::Start) => self.registry.start(&id).await,
            (Target::Timer(id), Transition::Pause) => self.registry.pause(&id).await,
            (Target::Timer(id), Transition::Reset) => self.registry.reset(&id).await,
            (Target::Category(c), Transition::Start) => {
                self.registry.start_all_in_category(&c).await
            }
            (Target::Category(c), Transition::Pause) => {
                self.registry.pause_all_in_category(&c).await
            }
            (Target::Category(c), Transition::Reset) => {
                self.registry.reset_all_in_category(&c).await
            }
        }
    }

    /// Start the actor loop on the runtime
    pub fn spawn(self) -> (TimerHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let task = tokio::spawn(timer_actor_task(self, rx));
        (TimerHandle::new(tx), task)
    }
}

/// Actor loop: one tick per [`TICK_PERIOD`], commands in between.
///
/// Late ticks are delayed rather than replayed in a burst. Ends on
/// [`Command::Shutdown`] or when every handle has been dropped.
pub async fn timer_actor_task<S: Store>(mut actor: TimerActor<S>, mut commands: mpsc::Receiver<Command>) {
    info!("Starting timer actor with {} timers", actor.registry.timers().len());

    let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let events = actor.tick().await;
                if !events.is_empty() {
                    debug!("Tick produced {} events", events.len());
                }
            }

            command = commands.recv() => {
                match command {
                    Some(command) => {
                        if actor.handle(command).await.is_break() {
                            break;
                        }
                    }
                    None => {
                        info!("All timer handles dropped, stopping actor");
                        break;
                    }
                }
            }
        }
    }

    info!("Timer actor stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        services::{BellHaptics, SilentNotifier},
        storage::MemoryStore,
    };
    use tokio::sync::oneshot;

    async fn actor() -> TimerActor<MemoryStore> {
        let ticker = TickEngine::new(Arc::new(SilentNotifier), Arc::new(BellHaptics::new(false)));
        let (events_tx, _) = broadcast::channel(4);
        TimerActor::load(Arc::new(MemoryStore::new()), ticker, events_tx).await
    }

    #[tokio::test]
    async fn shutdown_breaks_and_other_commands_continue() {
        let mut actor = actor().await;

        let (reply, rx) = oneshot::channel();
        assert!(actor.handle(Command::List { reply }).await.is_continue());
        assert!(rx.await.unwrap().is_empty());

        assert!(actor.handle(Command::Shutdown).await.is_break());
    }
}
