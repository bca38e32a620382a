//! Mirror rotation daemon.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │                ROTATION DAEMON                │
//!                    │                                               │
//!  GET /?action=...  │  ┌────────┐   trigger    ┌─────────────────┐  │
//!  ──────────────────┼─▶│ server │──────mpsc───▶│ scheduler task  │  │
//!                    │  └────────┘              │ (owns Resolver) │  │
//!  GET /status       │      ▲                   └────────┬────────┘  │
//!  ──────────────────┼──────┤                            │           │
//!                    │      │   RotationState (watch)    │           │
//!                    │      └────────────────────────────┘           │
//!                    │                                               │
//!                    │  per cycle: mirror list → order → sequential  │
//!                    │  probes → blocklist verdicts → one winner     │
//!                    └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use domain_rotator::config::loader::{load_config, SettingsError};
use domain_rotator::config::validation::validate_config;
use domain_rotator::lifecycle::Shutdown;
use domain_rotator::observability::metrics;
use domain_rotator::scheduler::Scheduler;
use domain_rotator::server;
use domain_rotator::RotatorConfig;

#[derive(Parser)]
#[command(name = "domain-rotator")]
#[command(about = "Server-side mirror rotation daemon", long_about = None)]
struct Cli {
    /// Path to the settings file (omitting it applies defaults, which
    /// still must pass validation).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => {
            // The built-in defaults carry no mirror list, so running
            // without a settings file fails the same checks a file would.
            let config = RotatorConfig::default();
            validate_config(&config).map_err(SettingsError::Validation)?;
            config
        }
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(format!(
                    "domain_rotator={}",
                    config.observability.log_level
                ))
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("domain-rotator v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.server.bind_address,
        probe_timeout_ms = config.probe.timeout_ms,
        poll_interval_ms = config.scheduler.poll_interval_ms,
        policy = ?config.order,
        blocklist = config.blocklist.is_some(),
        "settings loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(error) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                %error,
                "failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    shutdown.listen_for_signals();

    let (scheduler, rotator) = Scheduler::from_config(&config)?;
    tokio::spawn(scheduler.run(shutdown.subscribe()));

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "listening for rotation requests");

    server::run(listener, rotator, shutdown.subscribe()).await?;

    tracing::info!("domain-rotator stopped");
    Ok(())
}
