//! Sift HTTP server entry point
//!
//! Starts the tool server: discovery, file search and event stream.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sift::core::config::Config;
use sift::core::services::Services;
use sift::core::xdg::XdgDirs;
use sift::http;

/// Sift - sandboxed file-search tool server
#[derive(Parser, Debug)]
#[command(name = "sift")]
#[command(version)]
#[command(about = "Sandboxed file-search tool server with an event stream", long_about = None)]
struct Args {
    /// Configuration file (overrides XDG lookup)
    #[arg(long, env = "SIFT_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to bind
    #[arg(long)]
    port: Option<u16>,

    /// Directory searches are confined to
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// Log output format
    #[arg(long, env = "SIFT_LOG_FORMAT", default_value = "text")]
    log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

fn init_logging(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "sift=info,tower_http=debug".into());

    match format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

fn load_config(args: &Args) -> sift::Result<Config> {
    let mut config = match &args.config {
        Some(path) => {
            let mut config = Config::from_file(path)?;
            config.merge_env();
            config
        }
        None => {
            let xdg = XdgDirs::new();
            xdg.log_paths();
            Config::load_with_xdg(&xdg)?
        }
    };

    // CLI flags win over file and environment
    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(base_dir) = &args.base_dir {
        config.sandbox.base_dir = base_dir.clone();
    }

    config.validate()?;
    Ok(config)
}

async fn shutdown_signal(services: Arc<Services>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown requested");
    // Open event streams would otherwise keep the server alive
    services.shutdown();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.log_format);

    tracing::info!("Starting Sift tool server");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&args)?;
    config.log_config();

    let services = Arc::new(Services::new(&config)?);
    tracing::info!("Trusted root: {:?}", services.walker.root().path());

    let app = http::router(Arc::clone(&services));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Listening on {}", addr);
    tracing::info!("Service ready - Tools at http://{}/mcp/initialize", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(services))
        .await?;

    Ok(())
}
