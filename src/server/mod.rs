// Server module entry point
// Startup validation, listener binding and the accept loop

pub mod connection;
pub mod listener;
pub mod signal;

// Rust 不允许 loop 作为模块名（关键字），改用 server_loop
#[path = "loop.rs"]
pub mod server_loop;

use std::net::SocketAddr;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::{AppState, Config};
use crate::error::StartupError;
use crate::logger;

pub use listener::create_listener;
pub use server_loop::start_server_loop;
pub use signal::{start_signal_handler, SignalHandler};

/// A bound, not yet running, asset server
pub struct Server {
    listener: TcpListener,
    state: Arc<AppState>,
    local_addr: SocketAddr,
}

impl Server {
    /// Validate the configuration and bind the listener.
    ///
    /// Every check that can fail (header set, document root, address) runs
    /// before the socket is created, so a failed startup never leaves a
    /// listening port behind. Must be called from within a Tokio runtime.
    pub fn bind(config: Config) -> Result<Self, StartupError> {
        let root = config.validate_root()?;
        let addr = config.get_socket_addr()?;
        let state = Arc::new(AppState::new(config, root)?);

        let listener = create_listener(addr).map_err(|source| StartupError::Bind { addr, source })?;
        let local_addr = listener.local_addr()?;

        Ok(Self {
            listener,
            state,
            local_addr,
        })
    }

    /// Address actually bound (resolves port 0)
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serve until `signals` requests shutdown
    pub async fn run(self, signals: Arc<SignalHandler>) {
        logger::log_server_start(&self.local_addr, &self.state);
        let active_connections = Arc::new(AtomicUsize::new(0));
        start_server_loop(self.listener, self.state, active_connections, signals).await;
    }
}
