//! Telemetry Dashboard CLI

use std::path::PathBuf;

use clap::Parser;
use telemetry_dashboard::{load_config, Config};
use tracing::Level;

#[derive(Parser)]
#[command(name = "telemetry-dashboard")]
#[command(about = "Live sensor telemetry dashboard with threshold settings")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Telemetry server base URL (overrides config file)
    #[arg(long)]
    server_url: Option<String>,

    /// Dashboard port (overrides config file)
    #[arg(long)]
    dashboard_port: Option<u16>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, server_url={:?}, dashboard_port={:?}, log_level={:?}",
        args.config,
        args.server_url,
        args.dashboard_port,
        args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    if let Some(server_url) = args.server_url {
        config.telemetry.base_url = server_url;
    }
    if let Some(dashboard_port) = args.dashboard_port {
        config.dashboard.port = dashboard_port;
    }

    tracing::info!("Starting telemetry dashboard");
    telemetry_dashboard::run(config).await?;

    Ok(())
}
