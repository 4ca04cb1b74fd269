//! Configuration and CLI argument handling

use std::path::PathBuf;

use clap::Parser;

/// CLI argument parsing structure
#[derive(Parser, Debug, Clone)]
#[command(name = "multi-timer")]
#[command(about = "A categorized multi-timer daemon with durable completion history")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Directory holding timers.json and timerHistory.json
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Keep all state in memory; nothing survives a restart
    #[arg(long)]
    pub in_memory: bool,

    /// Wipe stored timers and history before starting
    #[arg(long)]
    pub reset_data: bool,

    /// Do not ring the bell when a timer completes
    #[arg(long)]
    pub no_vibrate: bool,

    /// Do not send desktop notifications
    #[arg(long)]
    pub no_notify: bool,

    /// Delete timers as soon as they complete
    #[arg(long)]
    pub auto_remove_completed: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Store directory: `--data-dir`, else the platform data directory
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("multi-timer")
        })
    }
}
