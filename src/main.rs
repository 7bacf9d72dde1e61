//! Graphite relay entry point.

use std::net::SocketAddr;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use graphite_proxy::api::{create_router, AppState};
use graphite_proxy::availability::{classify_response, Availability};
use graphite_proxy::config::Config;
use graphite_proxy::metrics;
use graphite_proxy::upstream::GraphiteClient;
use graphite_proxy::utils::shutdown_signal;

/// Graphite relay.
#[derive(Parser, Debug)]
#[command(name = "graphite-proxy")]
#[command(about = "Relays a fixed Graphite render query to an upstream helper API")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true, env = "VERBOSE")]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP listen port (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the relay endpoint (default).
    Run {
        /// HTTP listen port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Fetch once through the upstream and print UP or DOWN.
    Availability,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("graphite_proxy=debug,tower_http=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(),
        Some(Command::Availability) => cmd_availability().await,
        Some(Command::Run { port }) => cmd_run(port).await,
        None => cmd_run(args.port).await,
    }
}

/// Load and validate configuration, logging why it failed.
fn load_config() -> anyhow::Result<Config> {
    let config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    Ok(config)
}

/// Check configuration validity.
fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("GRAPHITE PROXY - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!(
        "  Upstream Host: {}",
        config.upstream_host().unwrap_or_else(|| "-".to_string())
    );
    println!("  Graphite Path: {}", config.graphite_path);
    println!("  Listen Port: {}", config.port);
    match config.upstream_timeout_ms {
        Some(ms) => println!("  Upstream Timeout: {}ms", ms),
        None => println!("  Upstream Timeout: none"),
    }
    match config.metrics_port {
        Some(p) => println!("  Metrics Port: {}", p),
        None => println!("  Metrics: Disabled"),
    }
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Fetch once and classify host availability.
async fn cmd_availability() -> anyhow::Result<()> {
    let config = load_config()?;
    let client = GraphiteClient::new(&config)?;

    let verdict = match client.fetch().await {
        Ok(response) => {
            info!("Upstream answered {}", response.status);
            classify_response(&response)
        }
        Err(e) => {
            warn!("Error fetching data from upstream: {}", e);
            Availability::Down
        }
    };

    println!("{}", verdict);
    Ok(())
}

/// Serve the relay endpoint until a shutdown signal arrives.
async fn cmd_run(port_override: Option<u16>) -> anyhow::Result<()> {
    info!("Loading configuration...");
    let mut config = load_config()?;

    if let Some(port) = port_override {
        config.port = port;
    }

    if let Some(metrics_port) = config.metrics_port {
        metrics::install_exporter(SocketAddr::from(([0, 0, 0, 0], metrics_port)))?;
    }
    metrics::init_metrics();

    let client = GraphiteClient::new(&config)?;
    info!(
        "Relaying to {}",
        config.upstream_host().unwrap_or_else(|| config.upstream_url.clone())
    );

    let router = create_router(AppState::new(client));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
