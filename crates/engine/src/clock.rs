//! Wall-clock capability

use std::fmt::Write;
use std::sync::Arc;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Duration, Local, NaiveDate};
use parking_lot::Mutex;

use crate::error::{EngineError, EngineResult};

/// Supplies the current time and calendar day
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;

    /// Calendar day used for the daily counter reset
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Local system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock that only moves when told to.
///
/// Clones share the same instant, so a test can keep one copy and hand
/// another to the engine.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Local>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Local>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn set(&self, instant: DateTime<Local>) {
        *self.now.lock() = instant;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now = *now + by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock()
    }
}

/// Render `instant` with a `chrono` format string
pub fn format_timestamp(instant: &DateTime<Local>, format: &str) -> EngineResult<String> {
    let mut out = String::new();
    write!(out, "{}", instant.format(format))
        .map_err(|_| EngineError::config(format!("invalid time format '{}'", format)))?;
    Ok(out)
}

/// True when every specifier in `format` is understood by `chrono`
pub fn is_valid_time_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}
