//! Engine configuration
//!
//! Every option has a default, so an empty TOML document is a valid
//! configuration:
//!
//! ```toml
//! agents = 25
//! logger = false
//! min_interval_ms = 200
//! max_interval_ms = 1500
//! time_format = "%H:%M:%S"
//! statuses = ["AVAILABLE", "TALKING", "NOT AVAILABLE"]
//! seed = 42
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::clock::is_valid_time_format;
use crate::error::{EngineError, EngineResult};
use crate::status::StatusCatalog;

/// Event name used when pushing snapshots to a sink
pub const DEFAULT_EVENT_NAME: &str = "call center status";

/// Configuration for [`Engine`](crate::engine::Engine)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of synthetic agents to create
    pub agents: usize,
    /// Render every snapshot to the console
    pub logger: bool,
    /// Lower bound of the randomized tick interval
    pub min_interval_ms: u64,
    /// Upper bound of the randomized tick interval
    pub max_interval_ms: u64,
    /// `chrono` format string for `stateChangeTime`
    pub time_format: String,
    /// Labels agents move between
    pub statuses: StatusCatalog,
    /// Event name used for pushed snapshots
    pub event_name: String,
    /// Seed for reproducible runs; entropy when absent
    pub seed: Option<u64>,
    /// Stop after this many ticks
    pub max_ticks: Option<u64>,
    /// Give up after this many failed ticks in a row
    pub max_consecutive_failures: Option<u32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            agents: 10,
            logger: false,
            min_interval_ms: 200,
            max_interval_ms: 1500,
            time_format: "%H:%M:%S".to_string(),
            statuses: StatusCatalog::default(),
            event_name: DEFAULT_EVENT_NAME.to_string(),
            seed: None,
            max_ticks: None,
            max_consecutive_failures: None,
        }
    }
}

impl EngineConfig {
    pub fn with_agents(mut self, agents: usize) -> Self {
        self.agents = agents;
        self
    }

    pub fn with_logger(mut self, logger: bool) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_statuses(mut self, statuses: StatusCatalog) -> Self {
        self.statuses = statuses;
        self
    }

    pub fn with_interval_ms(mut self, min: u64, max: u64) -> Self {
        self.min_interval_ms = min;
        self.max_interval_ms = max;
        self
    }

    pub fn with_time_format(mut self, format: impl Into<String>) -> Self {
        self.time_format = format.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_ticks(mut self, ticks: u64) -> Self {
        self.max_ticks = Some(ticks);
        self
    }

    pub fn with_max_consecutive_failures(mut self, failures: u32) -> Self {
        self.max_consecutive_failures = Some(failures);
        self
    }

    /// Check the configuration for values the engine cannot run with
    pub fn validate(&self) -> EngineResult<()> {
        if self.statuses.is_empty() {
            return Err(EngineError::EmptyStatusCatalog);
        }
        if self.min_interval_ms > self.max_interval_ms {
            return Err(EngineError::config(format!(
                "min_interval_ms ({}) is greater than max_interval_ms ({})",
                self.min_interval_ms, self.max_interval_ms
            )));
        }
        if self.time_format.trim().is_empty() || !is_valid_time_format(&self.time_format) {
            return Err(EngineError::config(format!(
                "invalid time_format '{}'",
                self.time_format
            )));
        }
        if self.event_name.is_empty() {
            return Err(EngineError::config("event_name must not be empty"));
        }
        Ok(())
    }

    pub fn from_toml_str(input: &str) -> EngineResult<Self> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> EngineResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}
