//! Polymarket arbitrage scanner entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use polymarket_scan::api::{create_router, AppState};
use polymarket_scan::config::Config;
use polymarket_scan::market::GammaClient;
use polymarket_scan::metrics;
use polymarket_scan::scan::{
    FormValues, HttpFeed, LocalFeed, OpportunityFeed, ScanOutcome, Scanner, TerminalSurface,
};
use polymarket_scan::utils::shutdown_signal;

/// Polymarket arbitrage scanner.
#[derive(Parser, Debug)]
#[command(name = "polymarket-scan")]
#[command(about = "Scan Polymarket events for multi-outcome arbitrage bundles")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve {
        /// HTTP server port (defaults to PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run one scan and print the cards.
    Scan {
        /// Scan service base URL; scans in-process against Gamma when omitted.
        #[arg(long)]
        server: Option<String>,

        /// Market category.
        #[arg(long)]
        category: Option<String>,

        /// Minimum edge.
        #[arg(long)]
        min_edge: Option<String>,

        /// Stake per outcome.
        #[arg(long)]
        stake: Option<String>,

        /// Maximum markets to scan.
        #[arg(long)]
        max_markets: Option<String>,
    },

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("polymarket_scan=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Handle subcommands
    match args.command {
        Some(Command::Serve { port }) => cmd_serve(port).await,
        Some(Command::Scan {
            server,
            category,
            min_edge,
            stake,
            max_markets,
        }) => cmd_scan(server, category, min_edge, stake, max_markets).await,
        Some(Command::CheckConfig) => cmd_check_config(),
        None => cmd_serve(None).await,
    }
}

/// Load and validate configuration, logging failures.
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
    println!("POLYMARKET SCANNER - CONFIGURATION CHECK");
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
    println!("  Gamma API: {}", config.gamma_api_url);
    println!("  Scanner URL: {}", config.scanner_url);
    println!("  Port: {}", config.port);
    println!("  Page Size: {}", config.page_size);
    println!("  HTTP Timeout: {}ms", config.http_timeout_ms);
    println!("  Default Category: {}", config.default_category);
    println!("  Default Min Edge: {}", config.default_min_edge);
    println!("  Default Stake: ${}", config.default_stake);
    println!("  Default Max Markets: {}", config.default_max_markets);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Run the HTTP server until shutdown.
async fn cmd_serve(port_override: Option<u16>) -> anyhow::Result<()> {
    info!("Loading configuration...");
    let config = load_config()?;
    let port = port_override.unwrap_or(config.port);

    let source = Arc::new(GammaClient::new(&config)?);
    let state = AppState::new(config, source).with_metrics(metrics::install_prometheus());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Run one scan and print the result to stdout.
async fn cmd_scan(
    server: Option<String>,
    category: Option<String>,
    min_edge: Option<String>,
    stake: Option<String>,
    max_markets: Option<String>,
) -> anyhow::Result<()> {
    let config = load_config()?;
    metrics::init_metrics();

    // Unset flags fall back to the configured defaults, like a prefilled form.
    let form = FormValues::with_values(
        &category.unwrap_or_else(|| config.default_category.clone()),
        &min_edge.unwrap_or_else(|| config.default_min_edge.to_string()),
        &stake.unwrap_or_else(|| config.default_stake.to_string()),
        &max_markets.unwrap_or_else(|| config.default_max_markets.to_string()),
    );

    let outcome = match server {
        Some(url) => {
            info!(server = %url, "Scanning via service");
            run_with(HttpFeed::new(&url, &config)?, form).await
        }
        None => {
            info!(gamma = %config.gamma_api_url, "Scanning in-process");
            let source = Arc::new(GammaClient::new(&config)?);
            run_with(LocalFeed::new(source, Arc::new(config)), form).await
        }
    };

    match outcome {
        ScanOutcome::Failed => Err(anyhow::anyhow!("Scan failed")),
        _ => Ok(()),
    }
}

async fn run_with<F: OpportunityFeed>(feed: F, form: FormValues) -> ScanOutcome {
    let scanner = Scanner::new(feed, TerminalSurface::stdout(), form);
    scanner.run_scan().await
}
