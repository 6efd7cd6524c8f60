use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use asset_server::config::{self, Config};
use asset_server::server::{start_signal_handler, Server, SignalHandler};
use asset_server::{logger, HeaderProfile, StartupError};

/// Serve a directory of pre-built web assets with fixed response headers
#[derive(Parser, Debug)]
#[command(name = "asset-server", version, about, long_about = None)]
struct Cli {
    /// Config file without extension (optional file, e.g. asset_server.toml)
    #[arg(short, long, default_value = config::DEFAULT_CONFIG_FILE)]
    config: String,

    /// Address to bind to (overrides server.host)
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides server.port)
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory to serve (overrides server.root)
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Header profile to apply; repeat to compose (replaces headers.profiles)
    #[arg(long = "profile", value_enum)]
    profiles: Vec<HeaderProfile>,

    /// Answer 404 instead of listing directories without an index document
    #[arg(long)]
    no_listing: bool,
}

impl Cli {
    fn apply(self, cfg: &mut Config) {
        if let Some(host) = self.host {
            cfg.server.host = host;
        }
        if let Some(port) = self.port {
            cfg.server.port = port;
        }
        if let Some(root) = self.root {
            cfg.server.root = root;
        }
        if !self.profiles.is_empty() {
            cfg.headers.profiles = self.profiles;
        }
        if self.no_listing {
            cfg.http.directory_listing = false;
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Startup failed: {e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), StartupError> {
    let mut cfg = Config::load_from(&cli.config)?;
    cli.apply(&mut cfg);

    logger::init(&cfg.logging);

    // Create the Tokio runtime, honouring the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    let result = runtime.block_on(async_main(cfg));
    // Do not wait on connections still in flight
    runtime.shutdown_timeout(Duration::from_secs(1));
    result
}

async fn async_main(cfg: Config) -> Result<(), StartupError> {
    let server = Server::bind(cfg)?;

    let signals = Arc::new(SignalHandler::new());
    start_signal_handler(Arc::clone(&signals))?;

    server.run(signals).await;
    Ok(())
}
