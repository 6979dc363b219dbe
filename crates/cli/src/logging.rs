use std::str::FromStr;

use anyhow::{anyhow, Result};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Logging options taken from the command line
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: Level,
    pub json: bool,
}

impl LoggingConfig {
    pub fn new(level: &str, json: bool) -> Result<Self> {
        let level =
            Level::from_str(level).map_err(|_| anyhow!("Invalid log level: {}", level))?;
        Ok(Self { level, json })
    }
}

/// Install the global subscriber. Logs go to stderr so they never mix with
/// the console snapshot on stdout.
pub fn setup_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(config.level.into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.json {
        builder
            .json()
            .try_init()
            .map_err(|e| anyhow!("failed to install logger: {}", e))
    } else {
        builder
            .try_init()
            .map_err(|e| anyhow!("failed to install logger: {}", e))
    }
}
