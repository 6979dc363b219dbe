//! Daily counter reset

use chrono::NaiveDate;
use tracing::info;

use crate::state::CallCenterState;

/// Zeroes all call counters when the calendar day changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyResetPolicy {
    last_reset_day: NaiveDate,
}

impl DailyResetPolicy {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            last_reset_day: today,
        }
    }

    pub fn last_reset_day(&self) -> NaiveDate {
        self.last_reset_day
    }

    /// Reset counters if `today` differs from the last reset day.
    ///
    /// Returns true when a reset happened. Aggregate and per-agent counters
    /// are cleared in the same call, before anything is published.
    pub fn maybe_reset(&mut self, state: &mut CallCenterState, today: NaiveDate) -> bool {
        if today == self.last_reset_day {
            return false;
        }

        let before = *state.calls();
        state.calls_mut().reset();
        for agent in state.agents.iter_mut() {
            agent.calls_mut().reset();
        }
        info!(
            previous_day = %self.last_reset_day,
            %today,
            accepted = before.accepted,
            rejected = before.rejected,
            "Day boundary crossed, call counters reset"
        );
        self.last_reset_day = today;
        true
    }
}
