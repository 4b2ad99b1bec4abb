//! Lockey server binary.
//!
//! # Usage
//!
//! ```bash
//! # Local node on the default port
//! lockey-server
//!
//! # Scheme prefixes are accepted and stripped
//! lockey-server --ip http://0.0.0.0 --port 9000 --grace-period-secs 5
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use lockey_core::SimpleLockService;
use lockey_server::{DrainOutcome, NodeConfig, SystemEnv};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Lockey lock service node
#[derive(Parser, Debug)]
#[command(name = "lockey-server")]
#[command(about = "Distributed lock service node")]
#[command(version)]
struct Args {
    /// IP to bind to (an http:// prefix is stripped)
    #[arg(long, default_value = "127.0.0.1")]
    ip: String,

    /// Port to bind to
    #[arg(short, long, default_value = "8080", allow_hyphen_values = true)]
    port: String,

    /// Seconds in-flight requests get to finish after SIGINT/SIGTERM
    #[arg(long, default_value = "10")]
    grace_period_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let config = NodeConfig::new(args.ip, args.port)
        .with_grace_period(Duration::from_secs(args.grace_period_secs));
    let lock_service = Arc::new(SimpleLockService::new(SystemEnv::new()));

    let report = match lockey_server::start(lock_service, config).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Node failed: {}", e);
            return Err(e.into());
        },
    };

    match report.drain {
        DrainOutcome::Completed => {},
        DrainOutcome::TimedOut => tracing::warn!("Exiting with in-flight requests abandoned"),
        DrainOutcome::Failed => tracing::warn!("Exiting after listener close failure"),
    }
    tracing::info!(
        signal = %report.signal,
        elapsed_ms = report.elapsed.as_millis(),
        "Shutting down"
    );

    // Abandoned request tasks must not hold the process open.
    std::process::exit(0)
}
