// Configuration module entry point
// Layered loading (defaults < file < environment) and the frozen runtime state

mod state;
mod types;

use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};

use crate::error::StartupError;

// Re-export public types
pub use state::AppState;
pub use types::{Config, HeadersConfig, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5060;
pub const DEFAULT_ROOT: &str = "build/web";
pub const DEFAULT_SERVER_NAME: &str = "asset-server";
pub const DEFAULT_CONFIG_FILE: &str = "asset_server";
pub const ENV_PREFIX: &str = "ASSET_SERVER";

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// The file is optional. Environment variables use the `ASSET_SERVER`
    /// prefix and `__` as the section separator, e.g.
    /// `ASSET_SERVER__SERVER__PORT=8080`.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::load_layered(config_path, None)
    }

    /// `env` replaces the process environment when set
    fn load_layered(
        config_path: &str,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("headers.profiles")
                    .with_list_parse_key("http.index_files")
                    .try_parsing(true)
                    .source(env),
            )
            .set_default("server.host", DEFAULT_HOST)?
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .set_default("server.root", DEFAULT_ROOT)?
            .set_default("headers.profiles", vec!["no_cache"])?
            .set_default("http.server_name", DEFAULT_SERVER_NAME)?
            .set_default("http.index_files", vec!["index.html", "index.htm"])?
            .set_default("http.directory_listing", true)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .build()?;

        settings.try_deserialize()
    }

    /// Resolve `host:port` into the address to bind.
    ///
    /// An empty host means every interface.
    pub fn get_socket_addr(&self) -> Result<SocketAddr, StartupError> {
        let host = if self.server.host.is_empty() {
            DEFAULT_HOST
        } else {
            self.server.host.as_str()
        };

        (host, self.server.port)
            .to_socket_addrs()
            .map_err(|e| StartupError::InvalidAddress(format!("{host}:{}: {e}", self.server.port)))?
            .next()
            .ok_or_else(|| {
                StartupError::InvalidAddress(format!("{host}:{} resolved to nothing", self.server.port))
            })
    }

    /// Check that the document root can be served and return its canonical path.
    pub fn validate_root(&self) -> Result<PathBuf, StartupError> {
        validate_root(&self.server.root)
    }
}

fn validate_root(root: &Path) -> Result<PathBuf, StartupError> {
    if !root.exists() {
        return Err(StartupError::RootMissing(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(StartupError::RootNotDirectory(root.to_path_buf()));
    }

    let unreadable = |source| StartupError::RootUnreadable {
        path: root.to_path_buf(),
        source,
    };
    std::fs::read_dir(root).map_err(unreadable)?;
    root.canonicalize().map_err(unreadable)
}
