//! Alphabet Entropy Service
//!
//! Runs the HTTP API. Configuration is layered: defaults, then the
//! optional TOML file, then environment variables, then flags.

use alphabet_entropy::api::{ApiServer, AppState, LogLevel, ServiceConfig};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Entropy and mutual information estimation service.
#[derive(Debug, Parser)]
#[command(name = "alphabet-entropy", version, about)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Listen address, overrides HOST.
    #[arg(long)]
    host: Option<String>,

    /// Listen port, overrides PORT.
    #[arg(short, long)]
    port: Option<u16>,

    /// DEBUG, INFO, WARNING, ERROR or CRITICAL; overrides LOG_LEVEL.
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<LogLevel>,
}

fn load_config(cli: &Cli) -> Result<ServiceConfig, String> {
    let mut config = match &cli.config {
        Some(path) => ServiceConfig::from_file(path).map_err(|e| e.to_string())?,
        None => ServiceConfig::default(),
    };
    config.apply_env().map_err(|e| e.to_string())?;

    if let Some(host) = &cli.host {
        config.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn init_tracing(level: LogLevel) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.tracing_directive()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };

    init_tracing(config.log_level);
    info!("Alphabet Entropy Service v{}", alphabet_entropy::VERSION);
    info!(
        environment = %config.environment,
        base_path = %config.api_base_path(),
        "Configuration loaded"
    );

    let state = match AppState::with_native_oracle(config) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Failed to create metrics registry: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = ApiServer::new(state).run().await {
        error!(error = %e, "Server terminated");
        std::process::exit(1);
    }

    info!("Done.");
}
