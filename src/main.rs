use clap::Parser;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use facility_analysis_gateway::{
    config::{Config, LogFormat},
    server::{self, AppState},
};

/// Facility analysis gateway server
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Address to listen on; overrides BIND_ADDR
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(bind) = cli.bind {
        config.server.bind_addr = bind;
    }

    init_logging(&config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Facility analysis gateway starting..."
    );

    let bind_addr = config.server.bind_addr.clone();
    let base_url = config.upstream.base_url.clone();

    let state = match AppState::from_config(config) {
        Ok(s) => {
            info!(base_url = %base_url, "Chat client initialized");
            Arc::new(s)
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize application state");
            return Err(e.into());
        }
    };

    let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
        Ok(l) => l,
        Err(e) => {
            error!(error = %e, addr = %bind_addr, "Failed to bind listener");
            return Err(e.into());
        }
    };

    info!(addr = %bind_addr, "Server ready, accepting requests");

    if let Err(e) = server::serve(listener, state).await {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_logging(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer())
                .init();
        }
    }
}
