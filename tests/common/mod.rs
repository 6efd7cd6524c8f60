//! Shared helpers: start a server over a temp root and speak raw HTTP/1.1

#![allow(dead_code)]

use asset_server::{Config, HeaderProfile, Server, SignalHandler};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;

pub struct TestServer {
    pub addr: SocketAddr,
    pub signals: Arc<SignalHandler>,
    pub handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn stop(self) {
        self.signals.trigger();
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("server did not stop")
            .expect("server task panicked");
    }
}

pub fn test_config(root: &Path, profiles: Vec<HeaderProfile>) -> Config {
    let mut cfg = Config::default();
    cfg.server.host = "127.0.0.1".to_string();
    cfg.server.port = 0;
    cfg.server.root = root.to_path_buf();
    cfg.headers.profiles = profiles;
    cfg.logging.access_log = false;
    cfg
}

pub fn start_with(cfg: Config) -> TestServer {
    let server = Server::bind(cfg).expect("server should bind");
    let addr = server.local_addr();
    let signals = Arc::new(SignalHandler::new());
    let handle = tokio::spawn(server.run(Arc::clone(&signals)));
    TestServer {
        addr,
        signals,
        handle,
    }
}

pub fn start(root: &Path, profiles: Vec<HeaderProfile>) -> TestServer {
    start_with(test_config(root, profiles))
}

#[derive(Debug)]
pub struct RawResponse {
    pub status: u16,
    /// Header lines in wire order
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn header_all(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|(n, _)| n.eq_ignore_ascii_case(name))
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

pub async fn request(addr: SocketAddr, method: &str, path: &str) -> RawResponse {
    request_with(addr, method, path, &[]).await
}

pub async fn request_with(
    addr: SocketAddr,
    method: &str,
    path: &str,
    extra_headers: &[(&str, &str)],
) -> RawResponse {
    let mut raw = format!("{method} {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n");
    for (name, value) in extra_headers {
        raw.push_str(&format!("{name}: {value}\r\n"));
    }
    raw.push_str("\r\n");

    let mut stream = TcpStream::connect(addr).await.expect("connect");
    stream.write_all(raw.as_bytes()).await.expect("write request");

    let mut buf = Vec::new();
    tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut buf))
        .await
        .expect("response timed out")
        .expect("read response");
    parse_response(&buf)
}

pub fn parse_response(buf: &[u8]) -> RawResponse {
    let split = buf
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response has a header terminator");
    let head = std::str::from_utf8(&buf[..split]).expect("ascii head");
    let body = buf[split + 4..].to_vec();

    let mut lines = head.split("\r\n");
    let status_line = lines.next().expect("status line");
    let status = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .expect("status code");

    let headers = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(n, v)| (n.trim().to_string(), v.trim().to_string()))
        .collect();

    RawResponse {
        status,
        headers,
        body,
    }
}
