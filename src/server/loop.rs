// Server loop module
// Accept loop; exits when shutdown is signalled

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::SignalHandler;
use crate::config;
use crate::logger;

/// Accept connections until `signals` requests shutdown.
///
/// The listener is dropped on return, so the port stops accepting right
/// away. Connection tasks already spawned keep running until they finish or
/// the runtime is dropped.
#[allow(clippy::ignored_unit_patterns)]
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<config::AppState>,
    active_connections: Arc<AtomicUsize>,
    signals: Arc<SignalHandler>,
) {
    while !signals.is_shutdown_requested() {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        // Shutdown won the race with this accept
                        if signals.is_shutdown_requested() {
                            break;
                        }
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        // Per-connection accept errors (e.g. EMFILE, ECONNABORTED) are not fatal
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            _ = signals.shutdown.notified() => {
                break;
            }
        }
    }

    if let Ok(addr) = listener.local_addr() {
        logger::log_shutdown(&addr);
    }
    drop(listener);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppState, Config};
    use crate::server::create_listener;
    use std::time::Duration;

    #[tokio::test]
    async fn test_loop_returns_when_shutdown_already_requested() {
        let dir = tempfile::tempdir().unwrap();
        let state = Arc::new(AppState::new(Config::default(), dir.path().canonicalize().unwrap()).unwrap());
        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();

        let signals = Arc::new(SignalHandler::new());
        signals.trigger();

        tokio::time::timeout(
            Duration::from_secs(1),
            start_server_loop(listener, state, Arc::new(AtomicUsize::new(0)), signals),
        )
        .await
        .unwrap();

        assert!(tokio::net::TcpStream::connect(addr).await.is_err());
    }
}
