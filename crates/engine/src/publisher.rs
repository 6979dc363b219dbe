//! Snapshot publication
//!
//! At the end of every tick the full [`CallCenterState`] is handed to up to
//! two sinks: a console renderer and a push sink. Neither acknowledges
//! delivery; a failing sink is reported back to the tick and logged there.

use std::io::{self, IsTerminal, Write};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::trace;

use crate::error::{EngineError, EngineResult};
use crate::state::CallCenterState;

/// Receiver of published snapshots
pub trait SnapshotSink: Send + Sync {
    /// Short name used in logs and errors
    fn name(&self) -> &str;

    fn emit(&self, event: &str, snapshot: &CallCenterState) -> EngineResult<()>;
}

/// Renders snapshots as pretty JSON to a writer.
///
/// When `redraw` is set the screen is cleared before each dump, so a
/// terminal shows one live snapshot instead of a scrolling log.
pub struct ConsoleSink {
    out: Mutex<Box<dyn Write + Send>>,
    redraw: bool,
}

impl ConsoleSink {
    /// Write to stdout, redrawing in place when stdout is a terminal
    pub fn stdout() -> Self {
        let redraw = io::stdout().is_terminal();
        Self::new(Box::new(io::stdout()), redraw)
    }

    pub fn new(out: Box<dyn Write + Send>, redraw: bool) -> Self {
        Self {
            out: Mutex::new(out),
            redraw,
        }
    }
}

impl SnapshotSink for ConsoleSink {
    fn name(&self) -> &str {
        "console"
    }

    fn emit(&self, _event: &str, snapshot: &CallCenterState) -> EngineResult<()> {
        let rendered = serde_json::to_string_pretty(snapshot)?;
        let mut out = self.out.lock();
        if self.redraw {
            // clear screen, cursor home
            write!(out, "\x1b[2J\x1b[H")?;
        }
        writeln!(out, "{}", rendered)?;
        out.flush()?;
        Ok(())
    }
}

/// A snapshot as delivered to push subscribers
#[derive(Debug, Clone)]
pub struct SnapshotEvent {
    pub name: String,
    pub payload: Arc<CallCenterState>,
}

/// Fans snapshots out to in-process subscribers over a broadcast channel
#[derive(Debug, Clone)]
pub struct BroadcastSink {
    sender: broadcast::Sender<SnapshotEvent>,
}

impl BroadcastSink {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SnapshotEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastSink {
    fn default() -> Self {
        Self::new(64)
    }
}

impl SnapshotSink for BroadcastSink {
    fn name(&self) -> &str {
        "broadcast"
    }

    fn emit(&self, event: &str, snapshot: &CallCenterState) -> EngineResult<()> {
        let event = SnapshotEvent {
            name: event.to_string(),
            payload: Arc::new(snapshot.clone()),
        };
        // Nobody listening is fine; the next subscriber gets the next tick
        if self.sender.send(event).is_err() {
            trace!("No subscribers for snapshot");
        }
        Ok(())
    }
}

/// Sends each snapshot to the configured sinks
#[derive(Default)]
pub struct SnapshotPublisher {
    console: Option<Arc<dyn SnapshotSink>>,
    push: Option<Arc<dyn SnapshotSink>>,
}

impl SnapshotPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_console(&mut self, sink: Arc<dyn SnapshotSink>) {
        self.console = Some(sink);
    }

    pub fn set_push(&mut self, sink: Arc<dyn SnapshotSink>) {
        self.push = Some(sink);
    }

    pub fn has_console(&self) -> bool {
        self.console.is_some()
    }

    pub fn has_push(&self) -> bool {
        self.push.is_some()
    }

    /// Console first, then push. A console failure still lets the push
    /// sink receive the snapshot; the first error is returned.
    pub fn publish(&self, event: &str, snapshot: &CallCenterState) -> EngineResult<()> {
        let mut first_error = None;
        for sink in [&self.console, &self.push].into_iter().flatten() {
            if let Err(e) = sink.emit(event, snapshot) {
                let err = match e {
                    EngineError::Sink { .. } => e,
                    other => EngineError::sink(sink.name(), other.to_string()),
                };
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
