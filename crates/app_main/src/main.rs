//! PlotView - image viewer shell with a bundled file picker
//!
//! Main entry point.

mod app;
mod render;
mod shell;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = app::Cli::parse();

    // Initialize logging and panic hook first
    let _log_guard = app_log::init()?;

    // Clean up old logs (7 days)
    if let Err(e) = app_log::cleanup_old_logs(7) {
        tracing::warn!("Failed to cleanup old logs: {}", e);
    }

    tracing::info!("PlotView starting...");

    // Load configuration
    let config = app_core::AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!("Failed to load configuration: {}", e);
        app_core::AppConfig::default()
    });

    // Run the application
    app::run(cli, config)
}
