//! Trip costing engine: CLI server
//!
//! Headless REST API for per-trip cost calculation, suitable for deployment
//! as a systemd service, Docker container, or standalone process.
//!
//! ```sh
//! # Run with default config (~/.config/trip-costing/config.toml)
//! trip-costing
//!
//! # Custom config path, demo drivers and units
//! trip-costing --config /etc/trip-costing/config.toml --seed-demo
//!
//! # Validate config without starting
//! trip-costing --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use trip_costing::config::AppConfig;
use trip_costing::server::{init_tracing, ServerHandle, ServerOptions};

/// Trip costing engine: cost per mile, margins and reconciliation per trip.
#[derive(Parser, Debug)]
#[command(
    name = "trip-costing",
    version,
    about = "Trip cost calculation service",
    long_about = "REST API that computes fixed, wage, rolling and accessorial cost \
                  per mile for each trip, with margin analysis and actual-cost \
                  reconciliation.\n\n\
                  Default config: ~/.config/trip-costing/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "TRIP_COSTING_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Insert demo drivers and units on startup.
    #[arg(long)]
    seed_demo: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.unwrap_or_else(trip_costing::default_config_path);

    let mut config = match AppConfig::load(&config_path) {
        Ok(mut cfg) => {
            if let Some(ref level) = cli.log_level {
                cfg.logging.level = level.clone();
            }
            init_tracing(&cfg);
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            let mut cfg = AppConfig::default();
            if let Some(ref level) = cli.log_level {
                cfg.logging.level = level.clone();
            }
            init_tracing(&cfg);
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
            cfg
        }
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(port) = cli.api_port {
        info!("CLI override: api_port = {}", port);
        config.server.api_port = port;
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        println!("✅ Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   API address : {}", config.api_address());
        println!("   Database    : {}", config.database.connection_url());
        println!("   Log level   : {}", config.logging.level);
        println!(
            "   Webhook     : {}",
            config.events.webhook_url.as_deref().unwrap_or("disabled")
        );
        return Ok(());
    }

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        seed_demo: cli.seed_demo,
    })
    .await?;

    // Install OS signal handlers (SIGTERM, SIGINT)
    handle.install_signal_handler();

    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
