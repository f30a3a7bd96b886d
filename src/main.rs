//! hf-proxy binary.
//!
//! ```text
//! hf-proxy [--config proxy.toml] [--bind 0.0.0.0:8080]
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use hf_proxy::config::{load_config, validate_config, ConfigError, ProxyConfig};
use hf_proxy::lifecycle::{signals, Shutdown};
use hf_proxy::observability::{logging, metrics};
use hf_proxy::HttpServer;

#[derive(Parser)]
#[command(name = "hf-proxy")]
#[command(about = "CORS passthrough proxy for huggingface.co", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    logging::init(&config.observability.log_level);

    tracing::info!("hf-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        path = %config.proxy.path,
        allowed_host_suffix = %config.proxy.allowed_host_suffix,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    let server_shutdown = shutdown.subscribe();
    let server_task = tokio::spawn(server.run(listener, server_shutdown));

    signals::wait_for_signal().await;
    shutdown.trigger();
    server_task.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
