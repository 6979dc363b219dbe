//! Synthetic agent population

use tracing::{debug, info};

use crate::error::EngineResult;
use crate::random::RandomSource;
use crate::state::{AgentRecord, AgentStatistics, CallCenterState};
use crate::status::StatusCatalog;

/// First extension number; agent `x` (1-based) gets `EXTENSION_BASE + x`
pub const EXTENSION_BASE: u64 = 1000;

const TEAMS: [&str; 2] = ["Team 1", "Team 2"];
const SKILLS: [&str; 2] = ["Sk 1001", "Sk 1002"];

/// Reduce "Alice Baker" to "A. Baker"
pub fn short_name(full_name: &str) -> String {
    let mut parts = full_name.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(first), Some(surname)) => match first.chars().next() {
            Some(initial) => format!("{}. {}", initial, surname),
            None => surname.to_string(),
        },
        (Some(only), None) => only.to_string(),
        _ => String::new(),
    }
}

/// Build agent `index` (1-based)
pub fn build_agent(
    index: usize,
    statuses: &StatusCatalog,
    rng: &mut dyn RandomSource,
    timestamp: &str,
) -> EngineResult<AgentRecord> {
    let status = statuses.pick(rng)?.to_string();
    let name = short_name(&rng.full_name());
    Ok(AgentRecord {
        id: rng.guid(),
        ext: EXTENSION_BASE + index as u64,
        agent: format!("{}{}", EXTENSION_BASE, index),
        name,
        status,
        state_change_time: timestamp.to_string(),
        teams: TEAMS.iter().map(|t| t.to_string()).collect(),
        skills: SKILLS.iter().map(|s| s.to_string()).collect(),
        statistics: AgentStatistics::default(),
        view_mode: 0,
    })
}

/// Append `count` freshly generated agents to `state`.
///
/// Counters on new agents start at zero; `timestamp` becomes every agent's
/// initial `stateChangeTime`.
pub fn initialize(
    state: &mut CallCenterState,
    count: usize,
    statuses: &StatusCatalog,
    rng: &mut dyn RandomSource,
    timestamp: &str,
) -> EngineResult<()> {
    state.agents.reserve(count);
    for index in 1..=count {
        let agent = build_agent(index, statuses, rng, timestamp)?;
        debug!(agent = %agent.agent, status = %agent.status, "Created agent {}", agent.name);
        state.agents.push(agent);
    }
    info!("Initialized population with {} agents", state.agents.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::StdRandomSource;
    use std::collections::HashSet;

    #[test]
    fn test_short_name() {
        assert_eq!(short_name("Alice Baker"), "A. Baker");
        assert_eq!(short_name("Cher"), "Cher");
        assert_eq!(short_name(""), "");
    }

    #[test]
    fn test_initialize_builds_codes_from_index() {
        let mut state = CallCenterState::default();
        let statuses = StatusCatalog::default();
        let mut rng = StdRandomSource::seeded(11);

        initialize(&mut state, 12, &statuses, &mut rng, "10:00:00").unwrap();

        assert_eq!(state.agents.len(), 12);
        assert_eq!(state.agents[0].ext, 1001);
        assert_eq!(state.agents[0].agent, "10001");
        assert_eq!(state.agents[11].ext, 1012);
        assert_eq!(state.agents[11].agent, "100012");

        let ids: HashSet<_> = state.agents.iter().map(|a| a.id).collect();
        assert_eq!(ids.len(), 12);

        for agent in &state.agents {
            assert!(statuses.contains(&agent.status));
            assert_eq!(agent.state_change_time, "10:00:00");
            assert_eq!(*agent.calls(), Default::default());
            assert_eq!(agent.view_mode, 0);
            assert_eq!(agent.teams, vec!["Team 1", "Team 2"]);
            assert!(agent.name.contains(". "));
        }
    }

    #[test]
    fn test_initialize_zero_agents() {
        let mut state = CallCenterState::default();
        let mut rng = StdRandomSource::seeded(1);
        initialize(&mut state, 0, &StatusCatalog::default(), &mut rng, "10:00:00").unwrap();
        assert!(state.agents.is_empty());
    }
}
