//! Error types
//!
//! Startup failures are fatal and end the process with a non-zero exit code.
//! Request failures are mapped to an HTTP status and never leave the handler.

use hyper::{Method, StatusCode};
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised before the listener starts accepting connections
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("root directory {} does not exist", .0.display())]
    RootMissing(PathBuf),

    #[error("root path {} is not a directory", .0.display())]
    RootNotDirectory(PathBuf),

    #[error("root directory {} is not readable: {source}", path.display())]
    RootUnreadable { path: PathBuf, source: io::Error },

    #[error("invalid listen address: {0}")]
    InvalidAddress(String),

    #[error("failed to bind {addr}: {source}")]
    Bind { addr: SocketAddr, source: io::Error },

    #[error("invalid response header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("runtime error: {0}")]
    Runtime(#[from] io::Error),
}

/// Per-request failures, reported to the client as a status code
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("not found")]
    NotFound,

    #[error("forbidden")]
    Forbidden,

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("method {0} not allowed")]
    MethodNotAllowed(Method),

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

impl RequestError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::Io(e) => match e.kind() {
                io::ErrorKind::NotFound => StatusCode::NOT_FOUND,
                io::ErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

pub type RequestResult<T> = Result<T, RequestError>;
