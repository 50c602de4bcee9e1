//! litess load generator.
//!
//! # Architecture Overview
//!
//! ```text
//!   settings.json ──poll──▶ SettingsWatcher ──update──▶ SettingsRegistry
//!                                                           │ read()
//!                                                           ▼
//!   ┌──────────┐   ┌──────────┐         ┌──────────┐   Snapshot (owned copy)
//!   │ Monkey 0 │   │ Monkey 1 │   ...   │ Monkey N │◀──────────┘
//!   └────┬─────┘   └────┬─────┘         └────┬─────┘
//!        │  car_count   │                    │
//!        ├──────────────┴───── StateStore ───┤
//!        │                                   │
//!        └────── POST /exec, /query ─────────┴──────▶ litess worker
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tokio::task::JoinSet;

use litess_loadgen::lifecycle::{wait_for_signal, Shutdown};
use litess_loadgen::loadgen::{Monkey, WorkerClient};
use litess_loadgen::observability::{logging, metrics};
use litess_loadgen::settings::{Manager, ManagerOptions};

#[derive(Parser)]
#[command(name = "litess-loadgen")]
#[command(about = "Generate car/wheel traffic against a litess worker", long_about = None)]
struct Cli {
    /// Base URL of the worker.
    #[arg(short, long, env = "WORKER_URL")]
    worker_url: String,

    /// Settings file polled for hot reload.
    #[arg(short, long, default_value = "settings.json")]
    settings: PathBuf,

    /// Milliseconds between settings polls.
    #[arg(long, default_value_t = 3000, value_parser = clap::value_parser!(u64).range(1..))]
    poll_interval_ms: u64,

    /// Number of simulated users.
    #[arg(short, long, default_value_t = 1)]
    users: usize,

    /// Log level when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Serve Prometheus metrics on this address.
    #[arg(long)]
    metrics_address: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level);

    tracing::info!("litess-loadgen v0.1.0 starting");

    if let Some(addr) = cli.metrics_address {
        metrics::init_metrics(addr)?;
    }

    let manager = Manager::start(ManagerOptions {
        path: cli.settings,
        poll_interval: Duration::from_millis(cli.poll_interval_ms),
    })?;
    let client = WorkerClient::new(&cli.worker_url)?;

    tracing::info!(
        worker_url = %cli.worker_url,
        settings = ?manager.options().path,
        poll_interval_ms = manager.options().poll_interval.as_millis() as u64,
        users = cli.users,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    let mut monkeys = JoinSet::new();
    for id in 0..cli.users {
        let monkey = Monkey::new(id, client.clone(), manager.clone());
        monkeys.spawn(monkey.run(shutdown.subscribe()));
    }

    wait_for_signal().await?;
    shutdown.trigger();
    manager.stop();

    while let Some(res) = monkeys.join_next().await {
        if let Err(e) = res {
            tracing::error!(error = %e, "Monkey task failed");
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
