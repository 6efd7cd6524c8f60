//! Static web asset server
//!
//! Serves a directory of pre-built web assets over HTTP/1.1 and decorates
//! every response with a configurable, ordered list of headers (no-cache,
//! CORS, frame embedding).
//!
//! ```no_run
//! use asset_server::{Config, Server, SignalHandler};
//! use std::sync::Arc;
//!
//! # async fn demo() -> Result<(), asset_server::StartupError> {
//! let mut config = Config::default();
//! config.server.port = 0;
//! let server = Server::bind(config)?;
//! println!("listening on {}", server.local_addr());
//! server.run(Arc::new(SignalHandler::new())).await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use config::Config;
pub use error::{RequestError, StartupError};
pub use http::{HeaderProfile, HeaderSet};
pub use server::{Server, SignalHandler};
