//! Shared fixtures for engine integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use callsim_engine::prelude::*;
use chrono::{DateTime, Local, TimeZone};
use parking_lot::Mutex;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Route engine logs through the test harness so a failing test shows the
/// fault-boundary `warn!`/`error!` lines. Safe to call from every test.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

#[derive(Default)]
struct Script {
    ranges: VecDeque<u64>,
    samples: VecDeque<Vec<usize>>,
    next_id: u128,
}

/// RandomSource that replays scripted draws.
///
/// Range draws fall back to `low` and sampling falls back to "nobody" once
/// the script runs out. Clones share one script.
#[derive(Clone, Default)]
pub struct ScriptedRandom {
    script: Arc<Mutex<Script>>,
}

impl ScriptedRandom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ranges(&self, values: &[u64]) {
        self.script.lock().ranges.extend(values.iter().copied());
    }

    pub fn push_sample(&self, indices: &[usize]) {
        self.script.lock().samples.push_back(indices.to_vec());
    }

    /// Script one tick: both sample-size draws, the chosen agents
    /// and one status index per chosen agent
    pub fn script_tick(&self, bound: u64, size: u64, agents: &[usize], status_indices: &[u64]) {
        self.push_ranges(&[bound, size]);
        self.push_sample(agents);
        self.push_ranges(status_indices);
    }
}

impl RandomSource for ScriptedRandom {
    fn range_inclusive(&mut self, low: u64, high: u64) -> u64 {
        match self.script.lock().ranges.pop_front() {
            Some(v) => v.clamp(low, high.max(low)),
            None => low,
        }
    }

    fn full_name(&mut self) -> String {
        "Alice Baker".to_string()
    }

    fn guid(&mut self) -> Uuid {
        let mut script = self.script.lock();
        script.next_id += 1;
        Uuid::from_u128(script.next_id)
    }

    fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize> {
        let picked = self.script.lock().samples.pop_front().unwrap_or_default();
        picked.into_iter().filter(|&i| i < len).take(amount).collect()
    }
}

pub fn noon(day: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap()
}

/// Sink that always fails
pub struct FailingSink {
    pub calls: AtomicUsize,
}

impl FailingSink {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

impl SnapshotSink for FailingSink {
    fn name(&self) -> &str {
        "failing"
    }

    fn emit(&self, _event: &str, _snapshot: &CallCenterState) -> EngineResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(EngineError::sink("failing", "transport down"))
    }
}

/// Sink that panics on its first emit and succeeds afterwards
pub struct PanicOnceSink {
    tripped: AtomicBool,
    pub delivered: AtomicUsize,
}

impl PanicOnceSink {
    pub fn new() -> Self {
        Self {
            tripped: AtomicBool::new(false),
            delivered: AtomicUsize::new(0),
        }
    }
}

impl SnapshotSink for PanicOnceSink {
    fn name(&self) -> &str {
        "panic-once"
    }

    fn emit(&self, _event: &str, _snapshot: &CallCenterState) -> EngineResult<()> {
        if !self.tripped.swap(true, Ordering::SeqCst) {
            panic!("serializer exploded");
        }
        self.delivered.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
