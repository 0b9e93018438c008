//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Initialize logging, metrics and the database in order
//! - Bind the listener and hand over to the HTTP server
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The listener is bound last so traffic only arrives when ready
//! - Without a config file the built-in defaults are used and nothing is
//!   watched

use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use crate::ai::AiError;
use crate::config::{load_config, ConfigError, ConfigWatcher, ServerConfig};
use crate::http::{AppState, HttpServer};
use crate::lifecycle::{signals, Shutdown};
use crate::observability::{logging, metrics};
use crate::store::{Database, StoreError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("database: {0}")]
    Store(#[from] StoreError),

    #[error("AI client: {0}")]
    Ai(#[from] AiError),

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),

    #[error("config watcher: {0}")]
    Watch(#[from] notify::Error),

    #[error("listener: {0}")]
    Io(#[from] std::io::Error),
}

/// Start the service and block until it shuts down.
pub async fn run(config_path: Option<PathBuf>) -> Result<(), StartupError> {
    let config = match &config_path {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = ?config_path,
        "localseo-router starting"
    );
    tracing::info!(
        bind_address = %config.listener.bind_address,
        database = %config.database.url,
        redirect_cache_ttl_secs = config.redirects.cache_ttl_secs,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );
    if config.admin.enabled && config.admin.api_key == "CHANGE_ME_IN_PRODUCTION" {
        tracing::warn!("Admin API is using the placeholder API key");
    }

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::MetricsAddress(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr);
    }

    let db = Database::connect(&config.database).await?;
    metrics::record_page_count(db.pages().count().await?);

    let state = AppState::new(&config, &db)?;
    let server = HttpServer::new(&config, state);

    // The watcher handle must outlive the server.
    let (_watcher, config_updates) = match &config_path {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        None => {
            let (_, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let shutdown_rx = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_shutdown_signal().await;
        shutdown.trigger();
    });

    server.run(listener, config_updates, shutdown_rx).await?;
    db.pool().close().await;

    tracing::info!("Shutdown complete");
    Ok(())
}
