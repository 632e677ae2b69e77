//! # panelforge-daemon
//!
//! A standalone panelforge extension host.
//!
//! This daemon is responsible for:
//! - Loading the extensions listed in its configuration
//! - Running them against the built-in program catalog
//! - Logging every UI registration they make in place of a dashboard
//! - Emitting the `load` event so extensions can be exercised end to end
//!
//! ## Configuration
//!
//! The daemon reads configuration from `$XDG_CONFIG_HOME/panelforge/config.toml`.
//! A documented default is written on first run.
//!
//! ## Running
//!
//! ```bash
//! # Start the daemon
//! cargo run --bin panelforge-daemon
//!
//! # With debug logging
//! RUST_LOG=debug cargo run --bin panelforge-daemon
//! ```

use anyhow::{Context, Result};
use panelforge_daemon::builtin::builtin_catalog;
use panelforge_daemon::config::Config;
use panelforge_daemon::hooks::LoggingHooks;
use panelforge_host::ExtensionHost;
use panelforge_runtime::{EventType, HttpFetcher};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from config.toml
    let (config, config_error) = match Config::load_default() {
        Ok(cfg) => (cfg, None),
        Err(e) => (Config::default(), Some(e)),
    };

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.daemon.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!("Starting panelforge-daemon v{}", env!("CARGO_PKG_VERSION"));
    match config_error {
        None => info!("Loaded configuration from default path"),
        Some(e) => warn!("Failed to load config, using defaults: {:#}", e),
    }

    let catalog = builtin_catalog();
    info!("Built-in programs: {:?}", catalog.entry_points());

    let fetcher = HttpFetcher::with_timeout(config.fetch_timeout())
        .context("Failed to create extension fetcher")?;
    let hooks = Arc::new(LoggingHooks::new());

    let host = ExtensionHost::builder()
        .extensions(config.extensions.clone())
        .config(config.host.clone())
        .hooks(hooks.clone())
        .fetcher(Arc::new(fetcher))
        .catalog(catalog)
        .build()
        .context("Failed to build extension host")?;

    // Queued until every extension has loaded.
    host.emit(EventType::Load, json!({ "page": "/" }));

    match host.initialize().await {
        Some(report) => info!(
            "Extensions settled: loaded={:?} fallbacks={:?} failed={:?}",
            report.loaded, report.fallbacks, report.failed
        ),
        None => info!("Extension loading skipped (host disabled)"),
    }

    info!("Export rows: {:?}", hooks.export_rows());
    info!("Press Ctrl+C to stop");

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutting down...");
    host.destroy();

    info!("Daemon stopped");
    Ok(())
}
