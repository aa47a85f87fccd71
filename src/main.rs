//! keymux: key-multiplexing reverse proxy.
//!
//! Resolves each inbound request to a backend origin via a routing key
//! (query parameter, Basic-Auth username, or cookie), looked up in a
//! persistent routing table through a 4-hour in-process cache, and
//! forwards the request with path, query, and body preserved.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use keymux::config::loader::load_config;
use keymux::observability::{logging, metrics};
use keymux::{HttpServer, ProxyConfig, Shutdown};

#[derive(Parser, Debug)]
#[command(name = "keymux", version, about = "Key-multiplexing reverse proxy")]
struct Cli {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };

    logging::init_logging(&config.observability);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        query_parameter = %config.routing.query_parameter,
        default_key = %config.routing.default_key,
        basic_authorization = config.routing.use_basic_authorization,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
