//! Logger module
//!
//! Thin layer over `tracing`:
//! - Subscriber setup driven by `RUST_LOG` or the configured level
//! - Server lifecycle logging
//! - Access logging with multiple formats (target `access`)

mod format;

pub use format::AccessLogEntry;

use crate::config::{AppState, LoggingConfig};
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber
///
/// `RUST_LOG` wins over `logging.level`. Installing twice is a no-op, which
/// keeps tests that start several servers quiet.
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

pub fn log_server_start(addr: &SocketAddr, state: &AppState) {
    let config = &state.config;
    tracing::info!("======================================");
    tracing::info!("Asset server started");
    tracing::info!("Listening on: http://{addr}");
    tracing::info!("Serving: {}", state.root.display());
    let profiles: Vec<&str> = config.headers.profiles.iter().map(|p| p.name()).collect();
    tracing::info!("Header profiles: [{}]", profiles.join(", "));
    if state.header_set.is_empty() {
        tracing::warn!("No response headers configured");
    } else {
        tracing::info!("Response headers: {}", state.header_set.len());
        for (name, value) in state.header_set.iter() {
            tracing::debug!("  {name}: {value:?}");
        }
    }
    if let Some(workers) = config.server.workers {
        tracing::info!("Worker threads: {workers}");
    }
    tracing::info!("======================================");
}

pub fn log_shutdown(addr: &SocketAddr) {
    tracing::info!("Listener on {addr} closed, shutting down");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::error!("Failed to serve connection: {err:?}");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: "access", "{}", entry.format(format));
}
