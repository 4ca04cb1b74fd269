//! Signal handling for graceful shutdown

use futures::stream::StreamExt;
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook_tokio::Signals;
use tracing::info;

/// Wait for SIGTERM or SIGINT and return the signal received.
///
/// Fails only when the signal handler cannot be installed.
pub async fn shutdown_signal() -> std::io::Result<i32> {
    let mut signals = Signals::new([SIGTERM, SIGINT])?;
    let handle = signals.handle();

    let received = signals.next().await;
    handle.close();

    let signal = received.unwrap_or(SIGTERM);
    info!("Received signal: {}", signal);
    Ok(signal)
}
