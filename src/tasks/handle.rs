//! Command messages and the cloneable handle that sends them

use tokio::sync::{mpsc, oneshot};

use crate::{
    engine::CategoryView,
    error::{EngineError, StoreError},
    state::{HistoryItem, NewTimer, Timer, TimerSpec, Transition},
};

pub type Reply<T> = oneshot::Sender<Result<T, StoreError>>;

/// Timers a transition applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Timer(String),
    Category(String),
}

/// Requests served by the timer actor
#[derive(Debug)]
pub enum Command {
    List {
        reply: oneshot::Sender<Vec<Timer>>,
    },
    Add {
        timer: NewTimer,
        reply: Reply<Timer>,
    },
    Transition {
        target: Target,
        transition: Transition,
        reply: Reply<()>,
    },
    Remove {
        id: String,
        reply: Reply<()>,
    },
    Categories {
        reply: oneshot::Sender<Vec<CategoryView>>,
    },
    ToggleCategory {
        category: String,
        reply: oneshot::Sender<bool>,
    },
    History {
        reply: oneshot::Sender<Vec<HistoryItem>>,
    },
    ClearHistory {
        reply: Reply<()>,
    },
    ExportHistory {
        reply: Reply<String>,
    },
    Shutdown,
}

/// Cloneable entry point to the timer actor
#[derive(Debug, Clone)]
pub struct TimerHandle {
    tx: mpsc::Sender<Command>,
}

impl TimerHandle {
    pub fn new(tx: mpsc::Sender<Command>) -> Self {
        Self { tx }
    }

    async fn ask<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, EngineError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(build(reply))
            .await
            .map_err(|_| EngineError::Stopped)?;
        rx.await.map_err(|_| EngineError::Stopped)
    }

    async fn ask_fallible<T>(
        &self,
        build: impl FnOnce(Reply<T>) -> Command,
    ) -> Result<T, EngineError> {
        Ok(self.ask(build).await??)
    }

    pub async fn list(&self) -> Result<Vec<Timer>, EngineError> {
        self.ask(|reply| Command::List { reply }).await
    }

    /// Validate and add a timer; invalid requests never reach the registry
    pub async fn add(&self, spec: TimerSpec) -> Result<Timer, EngineError> {
        let timer = spec.validate()?;
        self.ask_fallible(|reply| Command::Add { timer, reply })
            .await
    }

    pub async fn start(&self, id: &str) -> Result<(), EngineError> {
        self.transition(Target::Timer(id.to_string()), Transition::Start)
            .await
    }

    pub async fn pause(&self, id: &str) -> Result<(), EngineError> {
        self.transition(Target::Timer(id.to_string()), Transition::Pause)
            .await
    }

    pub async fn reset(&self, id: &str) -> Result<(), EngineError> {
        self.transition(Target::Timer(id.to_string()), Transition::Reset)
            .await
    }

    pub async fn start_category(&self, category: &str) -> Result<(), EngineError> {
        self.transition(Target::Category(category.to_string()), Transition::Start)
            .await
    }

    pub async fn pause_category(&self, category: &str) -> Result<(), EngineError> {
        self.transition(Target::Category(category.to_string()), Transition::Pause)
            .await
    }

    pub async fn reset_category(&self, category: &str) -> Result<(), EngineError> {
        self.transition(Target::Category(category.to_string()), Transition::Reset)
            .await
    }

    pub async fn transition(&self, target: Target, transition: Transition) -> Result<(), EngineError> {
        self.ask_fallible(|reply| Command::Transition {
            target,
            transition,
            reply,
        })
        .await
    }

    pub async fn remove(&self, id: &str) -> Result<(), EngineError> {
        let id = id.to_string();
        self.ask_fallible(|reply| Command::Remove { id, reply }).await
    }

    pub async fn categories(&self) -> Result<Vec<CategoryView>, EngineError> {
        self.ask(|reply| Command::Categories { reply }).await
    }

    /// Returns whether the category is expanded after the toggle
    pub async fn toggle_category(&self, category: &str) -> Result<bool, EngineError> {
        let category = category.to_string();
        self.ask(|reply| Command::ToggleCategory { category, reply })
            .await
    }

    pub async fn history(&self) -> Result<Vec<HistoryItem>, EngineError> {
        self.ask(|reply| Command::History { reply }).await
    }

    pub async fn clear_history(&self) -> Result<(), EngineError> {
        self.ask_fallible(|reply| Command::ClearHistory { reply })
            .await
    }

    pub async fn export_history(&self) -> Result<String, EngineError> {
        self.ask_fallible(|reply| Command::ExportHistory { reply })
            .await
    }

    /// Ask the actor to stop after the command in flight
    pub async fn shutdown(&self) -> Result<(), EngineError> {
        self.tx
            .send(Command::Shutdown)
            .await
            .map_err(|_| EngineError::Stopped)
    }
}
