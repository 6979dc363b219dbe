//! Call-center telemetry runner
//!
//! Builds an engine from flags and an optional TOML file, then ticks until
//! Ctrl-C or until `--max-ticks` is reached.

mod logging;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use callsim_engine::prelude::*;
use clap::Parser;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::logging::{setup_logging, LoggingConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Synthetic call-center telemetry generator", long_about = None)]
struct Args {
    /// TOML configuration file; flags override its values
    #[arg(short, long, env = "CALLSIM_CONFIG")]
    config: Option<PathBuf>,

    /// Number of synthetic agents
    #[arg(short, long, env = "CALLSIM_AGENTS")]
    agents: Option<usize>,

    /// Print every snapshot to stdout; `--logger false` overrides the file
    #[arg(short = 'l', long, num_args = 0..=1, default_missing_value = "true")]
    logger: Option<bool>,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many ticks
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

impl Args {
    fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::from_toml_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => EngineConfig::default(),
        };
        if let Some(agents) = self.agents {
            config.agents = agents;
        }
        if let Some(logger) = self.logger {
            config.logger = logger;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(max_ticks) = self.max_ticks {
            config.max_ticks = Some(max_ticks);
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(&LoggingConfig::new(&args.log_level, args.json_logs)?)?;
    info!("Starting callsim v{}", callsim_engine::VERSION);

    let config = args.engine_config()?;
    let dashboard = BroadcastSink::default();
    let mut updates = dashboard.subscribe();
    let watcher = tokio::spawn(async move {
        loop {
            match updates.recv().await {
                Ok(event) => debug!(
                    event = %event.name,
                    timing = event.payload.timing,
                    alerts = ?event.payload.alerts,
                    "Snapshot pushed"
                ),
                Err(RecvError::Lagged(missed)) => warn!("Snapshot watcher lagged by {}", missed),
                Err(RecvError::Closed) => break,
            }
        }
    });
    let mut engine = Engine::new(config)?.with_sink(Arc::new(dashboard));
    engine.init()?;

    let handle = engine.spawn();
    let stop = handle.stop_token();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl-C received, stopping");
            stop.cancel();
        }
    });

    let (engine, report) = handle.join().await?;
    ctrl_c.abort();
    watcher.abort();

    let calls = engine.state().calls();
    info!(
        ticks = report.ticks,
        failed_ticks = report.failed_ticks,
        accepted = calls.accepted,
        rejected = calls.rejected,
        "Run finished: {:?}",
        report.outcome
    );
    if let RunOutcome::Failed { last_error } = report.outcome {
        warn!("Engine stopped after repeated failures");
        anyhow::bail!(last_error);
    }
    Ok(())
}
