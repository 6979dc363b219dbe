//! # Call Center Telemetry Engine
//!
//! Synthetic telemetry for call-center monitoring dashboards. The engine
//! fabricates a population of agents, moves them between statuses on a
//! randomized cadence, keeps accepted/rejected call counters, and publishes
//! a full snapshot of the call center after every tick.
//!
//! The data is plausible-looking noise: there is no call routing, queueing,
//! or service-level model behind it.
//!
//! ## Components
//!
//! - **[`population`]**: builds the agent records at startup
//! - **[`sampler`]**: reassigns statuses for a random subset of agents each tick
//! - **[`statistics`]**: status histogram and derived alerts
//! - **[`reset`]**: zeroes call counters when the calendar day changes
//! - **[`publisher`]**: console and push sinks for snapshots
//! - **[`engine`]**: owns the state and schedules ticks
//!
//! Randomness and time are injected through [`RandomSource`] and [`Clock`],
//! so a run can be replayed from a seed or driven by a manual clock.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use callsim_engine::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EngineConfig::default().with_agents(10).with_logger(true);
//!     let mut engine = Engine::new(config)?;
//!     engine.init()?;
//!
//!     let handle = engine.spawn();
//!     tokio::signal::ctrl_c().await?;
//!     handle.stop();
//!     handle.join().await?;
//!     Ok(())
//! }
//! ```

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod population;
pub mod publisher;
pub mod random;
pub mod reset;
pub mod sampler;
pub mod state;
pub mod statistics;
pub mod status;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::EngineConfig;
pub use engine::{Engine, EngineHandle, RunOutcome, RunReport, TickSummary};
pub use error::{EngineError, EngineResult};
pub use publisher::{BroadcastSink, ConsoleSink, SnapshotEvent, SnapshotPublisher, SnapshotSink};
pub use random::{RandomSource, StdRandomSource};
pub use state::{AgentRecord, CallCenterState, CallCounters};
pub use status::StatusCatalog;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports for running the engine
pub mod prelude {
    pub use crate::clock::{Clock, ManualClock, SystemClock};
    pub use crate::config::{EngineConfig, DEFAULT_EVENT_NAME};
    pub use crate::engine::{Engine, EngineHandle, RunOutcome, RunReport, TickSummary};
    pub use crate::error::{EngineError, EngineResult};
    pub use crate::publisher::{BroadcastSink, ConsoleSink, SnapshotEvent, SnapshotSink};
    pub use crate::random::{RandomSource, StdRandomSource};
    pub use crate::state::{AgentRecord, CallCenterState, CallCounters};
    pub use crate::statistics::NO_AGENTS_AVAILABLE;
    pub use crate::status::{StatusCatalog, AVAILABLE, NOT_AVAILABLE, TALKING};
    pub use tokio_util::sync::CancellationToken;
}
