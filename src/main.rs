//! Multi Timer - a categorized multi-timer daemon
//!
//! This is the main entry point for the multi-timer application.

use std::sync::Arc;
use tokio::{net::TcpListener, sync::broadcast};
use tracing::{error, info};

use multi_timer::{
    api::create_router,
    config::Config,
    engine::TickEngine,
    services::{select_notifier, BellHaptics},
    state::AppState,
    storage::{FileStore, MemoryStore, Store},
    tasks::{completion_policy_task, TimerActor},
    utils::shutdown_signal,
};

const EVENT_BUFFER: usize = 100;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("multi_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting multi-timer server v{}", env!("CARGO_PKG_VERSION"));

    if config.in_memory {
        info!("Configuration: host={}, port={}, store=memory", config.host, config.port);
        run(config, Arc::new(MemoryStore::new())).await
    } else {
        let dir = config.data_dir();
        info!(
            "Configuration: host={}, port={}, store={}",
            config.host,
            config.port,
            dir.display()
        );
        let store = FileStore::open(&dir)?;
        run(config, Arc::new(store)).await
    }
}

async fn run<S: Store>(config: Config, store: Arc<S>) -> anyhow::Result<()> {
    if config.reset_data {
        info!("Clearing stored timers and history");
        store.clear().await?;
    }

    // Collaborators for tick side effects
    let notifier = select_notifier(!config.no_notify).await;
    let haptics = Arc::new(BellHaptics::new(!config.no_vibrate));
    info!("Completion haptics: {}", if haptics.is_enabled() { "bell" } else { "off" });
    let ticker = TickEngine::new(notifier, haptics);

    // Load timers and start the actor
    let (events_tx, _) = broadcast::channel(EVENT_BUFFER);
    let actor = TimerActor::load(store, ticker, events_tx.clone()).await;
    let (timers, actor_task) = actor.spawn();

    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        timers.clone(),
        events_tx,
    ));

    let policy_task = if config.auto_remove_completed {
        let events = state.subscribe();
        Some(tokio::spawn(completion_policy_task(timers.clone(), events)))
    } else {
        None
    };

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET    /timers                       - List timers");
    info!("  POST   /timers                       - Create a timer");
    info!("  POST   /timers/:id/start|pause|reset - Control one timer");
    info!("  DELETE /timers/:id                   - Delete a timer");
    info!("  GET    /categories                   - Timers grouped by category");
    info!("  POST   /categories/:c/start|pause|reset|toggle");
    info!("  GET    /history, /history/export     - Completed runs");
    info!("  DELETE /history                      - Clear history");
    info!("  GET    /status, /health");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                error!("Server error: {}", e);
            }
        }
        signal = shutdown_signal() => {
            match signal {
                Ok(_) => info!("Shutdown signal received"),
                Err(e) => error!("Failed to install signal handler: {}", e),
            }
        }
    }

    // Stop ticking before exit
    if let Err(e) = timers.shutdown().await {
        error!("Failed to stop timer actor: {}", e);
    }
    if let Err(e) = actor_task.await {
        error!("Timer actor panicked: {}", e);
    }
    if let Some(task) = policy_task {
        task.abort();
    }

    info!("Server shutdown complete");
    Ok(())
}
