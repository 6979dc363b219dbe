//! Call-center state published to dashboards
//!
//! Field names follow the dashboard payload (`stateChangeTime`, `viewMode`,
//! `statistics.by.calls`, ...), so the serialized form of
//! [`CallCenterState`] is the snapshot itself.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Accepted/rejected call counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallCounters {
    pub accepted: u64,
    pub rejected: u64,
}

impl CallCounters {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Per-agent counters, nested as `statistics.by.calls`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentStatistics {
    pub by: AgentBreakdown,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentBreakdown {
    pub calls: CallCounters,
}

/// One synthetic agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentRecord {
    pub id: Uuid,
    pub ext: u64,
    pub agent: String,
    pub name: String,
    pub status: String,
    pub state_change_time: String,
    pub teams: Vec<String>,
    pub skills: Vec<String>,
    pub statistics: AgentStatistics,
    pub view_mode: u8,
}

impl AgentRecord {
    pub fn calls(&self) -> &CallCounters {
        &self.statistics.by.calls
    }

    pub fn calls_mut(&mut self) -> &mut CallCounters {
        &mut self.statistics.by.calls
    }
}

/// Aggregate statistics, nested as `statistics.by.{status,calls}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub by: Breakdown,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakdown {
    /// Status histogram; labels with no agents are absent
    pub status: BTreeMap<String, usize>,
    pub calls: CallCounters,
}

/// Everything the engine owns and publishes each tick
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallCenterState {
    pub agents: Vec<AgentRecord>,
    pub statistics: Statistics,
    /// Rebuilt from scratch every tick
    pub alerts: Vec<String>,
    /// Interval in milliseconds chosen for the most recent tick
    pub timing: u64,
}

impl CallCenterState {
    pub fn calls(&self) -> &CallCounters {
        &self.statistics.by.calls
    }

    pub fn calls_mut(&mut self) -> &mut CallCounters {
        &mut self.statistics.by.calls
    }

    pub fn histogram(&self) -> &BTreeMap<String, usize> {
        &self.statistics.by.status
    }

    /// Agents currently holding `status`
    pub fn count_in(&self, status: &str) -> usize {
        self.statistics.by.status.get(status).copied().unwrap_or(0)
    }

    pub fn population(&self) -> usize {
        self.agents.len()
    }
}
