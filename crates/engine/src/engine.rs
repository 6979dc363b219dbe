//! # Telemetry Engine
//!
//! The [`Engine`] owns one [`CallCenterState`] and drives it forward in
//! ticks. Each pass of the scheduler:
//!
//! 1. draws the next interval in `[min_interval_ms, max_interval_ms]` and
//!    records it as `timing`,
//! 2. applies the daily counter reset if the calendar day changed,
//! 3. waits for the interval (or for a stop request),
//! 4. runs one tick: sample → aggregate → alerts → publish.
//!
//! The next interval is only drawn after the previous tick has fully
//! returned, so ticks never overlap. A tick that errors or panics is logged
//! and counted; the scheduler keeps going unless
//! `max_consecutive_failures` is exceeded.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use callsim_engine::prelude::*;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dashboard = BroadcastSink::default();
//! let mut updates = dashboard.subscribe();
//!
//! let mut engine = Engine::new(EngineConfig::default().with_agents(25))?
//!     .with_sink(Arc::new(dashboard));
//! engine.init()?;
//!
//! let handle = engine.spawn();
//! let event = updates.recv().await?;
//! println!("{} agents, alerts: {:?}", event.payload.agents.len(), event.payload.alerts);
//!
//! handle.stop();
//! let (_engine, report) = handle.join().await?;
//! println!("ran {} ticks", report.ticks);
//! # Ok(())
//! # }
//! ```

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::clock::{format_timestamp, Clock, SystemClock};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::population;
use crate::publisher::{ConsoleSink, SnapshotPublisher, SnapshotSink};
use crate::random::{RandomSource, StdRandomSource};
use crate::reset::DailyResetPolicy;
use crate::sampler;
use crate::state::CallCenterState;
use crate::statistics;

/// Result of a single tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickSummary {
    /// 1-based tick number
    pub tick: u64,
    /// Agents whose status was reassigned
    pub selected: Vec<usize>,
    /// Alerts raised by this tick
    pub alerts: usize,
}

/// Why a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Stop was requested
    Stopped,
    /// `max_ticks` ticks were executed
    TickLimitReached,
    /// Too many consecutive ticks failed
    Failed { last_error: String },
}

/// Summary of a finished run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Ticks executed during this run, including failed ones
    pub ticks: u64,
    pub failed_ticks: u64,
    pub outcome: RunOutcome,
}

/// Synthetic call-center telemetry engine
pub struct Engine {
    config: EngineConfig,
    state: CallCenterState,
    rng: Box<dyn RandomSource>,
    clock: Arc<dyn Clock>,
    reset: DailyResetPolicy,
    publisher: SnapshotPublisher,
    initialized: bool,
    tick_count: u64,
}

impl Engine {
    /// Engine with system time and an entropy-seeded (or `config.seed`) RNG
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        let rng = StdRandomSource::from_seed_option(config.seed);
        Self::with_capabilities(config, Box::new(rng), Arc::new(SystemClock))
    }

    /// Engine with injected randomness and time
    pub fn with_capabilities(
        config: EngineConfig,
        rng: Box<dyn RandomSource>,
        clock: Arc<dyn Clock>,
    ) -> EngineResult<Self> {
        config.validate()?;

        let mut publisher = SnapshotPublisher::new();
        if config.logger {
            publisher.set_console(Arc::new(ConsoleSink::stdout()));
        }
        let reset = DailyResetPolicy::new(clock.today());

        Ok(Self {
            config,
            state: CallCenterState::default(),
            rng,
            clock,
            reset,
            publisher,
            initialized: false,
            tick_count: 0,
        })
    }

    /// Push every snapshot to `sink` under the configured event name
    pub fn with_sink(mut self, sink: Arc<dyn SnapshotSink>) -> Self {
        self.publisher.set_push(sink);
        self
    }

    /// Render every snapshot to `sink`, whether or not `logger` is set.
    /// Replaces the stdout renderer that `logger` installs.
    pub fn with_console(mut self, sink: Arc<dyn SnapshotSink>) -> Self {
        self.publisher.set_console(sink);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> &CallCenterState {
        &self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Ticks executed over the engine's lifetime
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    fn timestamp(&self) -> EngineResult<String> {
        format_timestamp(&self.clock.now(), &self.config.time_format)
    }

    /// Create the agent population. Only allowed once per engine.
    pub fn init(&mut self) -> EngineResult<()> {
        if self.initialized {
            return Err(EngineError::AlreadyInitialized {
                agents: self.state.agents.len(),
            });
        }
        let timestamp = self.timestamp()?;
        population::initialize(
            &mut self.state,
            self.config.agents,
            &self.config.statuses,
            self.rng.as_mut(),
            &timestamp,
        )?;
        self.initialized = true;
        Ok(())
    }

    /// Draw the next interval, store it as `timing`, and apply the daily
    /// reset. Returns how long to wait before the next tick.
    pub fn prepare_tick(&mut self) -> Duration {
        let timing = self
            .rng
            .range_inclusive(self.config.min_interval_ms, self.config.max_interval_ms);
        self.state.timing = timing;

        let today = self.clock.today();
        self.reset.maybe_reset(&mut self.state, today);

        Duration::from_millis(timing)
    }

    /// One sample → aggregate → alert → publish pass
    pub fn tick(&mut self) -> EngineResult<TickSummary> {
        self.tick_count += 1;
        let timestamp = self.timestamp()?;

        let outcome = sampler::sample(
            &mut self.state,
            &self.config.statuses,
            self.rng.as_mut(),
            &timestamp,
        )?;
        statistics::aggregate(&mut self.state);
        statistics::apply_alerts(&mut self.state);
        self.publisher
            .publish(&self.config.event_name, &self.state)?;

        debug!(
            tick = self.tick_count,
            timing = self.state.timing,
            changed = outcome.selected.len(),
            accepted = self.state.calls().accepted,
            rejected = self.state.calls().rejected,
            "Tick complete"
        );

        Ok(TickSummary {
            tick: self.tick_count,
            selected: outcome.selected,
            alerts: self.state.alerts.len(),
        })
    }

    /// [`tick`](Self::tick) with panics turned into errors
    fn guarded_tick(&mut self) -> EngineResult<TickSummary> {
        let next = self.tick_count + 1;
        match panic::catch_unwind(AssertUnwindSafe(|| self.tick())) {
            Ok(result) => result,
            Err(payload) => Err(EngineError::TickPanicked {
                tick: next,
                message: panic_message(payload.as_ref()),
            }),
        }
    }

    /// Run ticks until `stop` is cancelled, `max_ticks` is reached, or too
    /// many ticks fail in a row. Initializes the population first if
    /// [`init`](Self::init) was not called.
    pub async fn run(&mut self, stop: CancellationToken) -> EngineResult<RunReport> {
        if !self.initialized {
            self.init()?;
        }

        info!(
            agents = self.state.agents.len(),
            min_interval_ms = self.config.min_interval_ms,
            max_interval_ms = self.config.max_interval_ms,
            "Telemetry engine started"
        );

        let mut ticks = 0u64;
        let mut failed_ticks = 0u64;
        let mut consecutive_failures = 0u32;

        let outcome = loop {
            if stop.is_cancelled() {
                break RunOutcome::Stopped;
            }
            if matches!(self.config.max_ticks, Some(max) if ticks >= max) {
                break RunOutcome::TickLimitReached;
            }

            let interval = self.prepare_tick();
            tokio::select! {
                biased;
                _ = stop.cancelled() => break RunOutcome::Stopped,
                _ = tokio::time::sleep(interval) => {}
            }

            ticks += 1;
            match self.guarded_tick() {
                Ok(_) => consecutive_failures = 0,
                Err(e) => {
                    failed_ticks += 1;
                    consecutive_failures += 1;
                    error!(tick = self.tick_count, error = %e, "Tick failed");
                    if matches!(
                        self.config.max_consecutive_failures,
                        Some(limit) if consecutive_failures >= limit
                    ) {
                        break RunOutcome::Failed {
                            last_error: e.to_string(),
                        };
                    }
                }
            }
        };

        match &outcome {
            RunOutcome::Failed { last_error } => warn!(
                ticks,
                failed_ticks,
                "Telemetry engine gave up after {} consecutive failures: {}",
                consecutive_failures,
                last_error
            ),
            _ => info!(ticks, failed_ticks, ?outcome, "Telemetry engine stopped"),
        }

        Ok(RunReport {
            ticks,
            failed_ticks,
            outcome,
        })
    }

    /// Run on a tokio task and return a handle that can stop it
    pub fn spawn(mut self) -> EngineHandle {
        let stop = CancellationToken::new();
        let token = stop.clone();
        let task = tokio::spawn(async move {
            let report = self.run(token).await;
            (self, report)
        });
        EngineHandle { stop, task }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Handle to an engine running on a background task
pub struct EngineHandle {
    stop: CancellationToken,
    task: JoinHandle<(Engine, EngineResult<RunReport>)>,
}

impl EngineHandle {
    /// Ask the scheduler to stop before arming its next timer
    pub fn stop(&self) {
        self.stop.cancel();
    }

    /// Token that stops the engine when cancelled
    pub fn stop_token(&self) -> CancellationToken {
        self.stop.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Wait for the run to end and take the engine back
    pub async fn join(self) -> EngineResult<(Engine, RunReport)> {
        let (engine, report) = self
            .task
            .await
            .map_err(|e| EngineError::internal(format!("engine task failed: {}", e)))?;
        Ok((engine, report?))
    }
}
