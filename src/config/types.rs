// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::http::{CustomHeader, HeaderProfile};

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub headers: HeadersConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
}

/// Listener and document root
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory that bounds every servable path
    pub root: PathBuf,
    pub workers: Option<usize>,
}

/// Response header decoration
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct HeadersConfig {
    /// Profiles applied in order
    #[serde(default)]
    pub profiles: Vec<HeaderProfile>,
    /// Extra headers appended after the profiles
    #[serde(default)]
    pub custom: Vec<CustomHeader>,
}

/// HTTP behaviour of the file handler
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub index_files: Vec<String>,
    /// Render an HTML listing for directories without an index document
    pub directory_listing: bool,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: super::DEFAULT_HOST.to_string(),
                port: super::DEFAULT_PORT,
                root: PathBuf::from(super::DEFAULT_ROOT),
                workers: None,
            },
            headers: HeadersConfig {
                profiles: vec![HeaderProfile::NoCache],
                custom: Vec::new(),
            },
            http: HttpConfig {
                server_name: super::DEFAULT_SERVER_NAME.to_string(),
                index_files: vec!["index.html".to_string(), "index.htm".to_string()],
                directory_listing: true,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                access_log: true,
                access_log_format: default_access_log_format(),
            },
            performance: PerformanceConfig {
                keep_alive_timeout: 75,
                read_timeout: 30,
                write_timeout: 30,
                max_connections: None,
            },
        }
    }
}
