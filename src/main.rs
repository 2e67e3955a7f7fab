use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use reserve_funds::config::{load_config, ServiceConfig};
use reserve_funds::lifecycle::{build_service, signals, Shutdown};
use reserve_funds::observability::{logging, metrics};
use reserve_funds::HttpServer;

#[derive(Parser)]
#[command(name = "reserve-funds")]
#[command(about = "Funds reservation service with overdraft protection", long_about = None)]
struct Args {
    /// Path to a TOML config file; built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };

    logging::init_logging(&config.observability)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "reserve-funds starting");
    tracing::info!(
        config_path = ?args.config,
        bind_address = %config.listener.bind_address,
        ledger_url = %config.ledger.url,
        max_attempts = config.retries.max_attempts,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let service = build_service(&config)?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, service);
    let server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    signals::wait_for_shutdown(&shutdown).await;
    server_task.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
