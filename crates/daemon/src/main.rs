use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use seedsync_core::{
    load_config, validate_config, JsonFileCache, QBittorrentClient, SanitizedConfig,
    SeedLimitSync, SyncOptions,
};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let json = std::env::var("LOG_FORMAT")
        .map(|f| f.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn run() -> Result<()> {
    init_logging();
    info!("seedsync {} starting", VERSION);

    // An explicit config file must exist; the default one is optional
    let config_path = std::env::var("SEEDSYNC_CONFIG").ok().map(PathBuf::from);
    if let Some(path) = &config_path {
        info!("Loading configuration from {:?}", path);
    }

    let config = load_config(config_path.as_deref()).context("Failed to load configuration")?;
    validate_config(&config).context("Configuration validation failed")?;
    info!("Configuration: {:?}", SanitizedConfig::from(&config));

    let client = QBittorrentClient::from_config(&config)
        .context("Failed to create qBittorrent client")?;
    info!("Using qBittorrent at {}", config.url);

    let cache = JsonFileCache::with_expiry_days(&config.cache_path, config.cache_expiry_days);
    info!(
        "Sync cache at {:?} ({} days expiry)",
        config.cache_path, config.cache_expiry_days
    );

    if config.dry_run {
        warn!("Dry run: limits will be logged, not applied");
    }

    let sync = SeedLimitSync::new(SyncOptions::from(&config), Arc::new(client), Arc::new(cache));

    tokio::select! {
        _ = sync.run_forever() => {}
        _ = shutdown_signal() => {
            info!("Shutdown signal received, stopping");
        }
    }

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
