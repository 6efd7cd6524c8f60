// Application state module
// Read-only state shared by every connection task

use hyper::header::HeaderValue;
use std::path::PathBuf;

use super::types::Config;
use crate::error::StartupError;
use crate::http::HeaderSet;

/// Application state, frozen at startup
pub struct AppState {
    pub config: Config,
    /// Canonical document root
    pub root: PathBuf,
    /// Headers appended to every response
    pub header_set: HeaderSet,
    pub server_name: HeaderValue,
}

impl AppState {
    /// Build the shared state from a loaded configuration and a validated root
    pub fn new(config: Config, root: PathBuf) -> Result<Self, StartupError> {
        let header_set = HeaderSet::build(&config.headers.profiles, &config.headers.custom)?;
        let server_name = HeaderValue::from_str(&config.http.server_name).map_err(|e| {
            StartupError::InvalidHeader {
                name: "Server".to_string(),
                reason: e.to_string(),
            }
        })?;

        Ok(Self {
            config,
            root,
            header_set,
            server_name,
        })
    }

    pub const fn access_log(&self) -> bool {
        self.config.logging.access_log
    }
}
