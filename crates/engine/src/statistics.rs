//! Status histogram and alert derivation

use std::collections::BTreeMap;

use tracing::warn;

use crate::state::CallCenterState;
use crate::status::AVAILABLE;

/// Raised when no agent holds the available status
pub const NO_AGENTS_AVAILABLE: &str = "no agents available";

/// Count agents per status over the whole population
pub fn histogram(state: &CallCenterState) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for agent in &state.agents {
        *counts.entry(agent.status.clone()).or_insert(0) += 1;
    }
    counts
}

/// Replace `statistics.by.status` with a fresh count
pub fn aggregate(state: &mut CallCenterState) {
    state.statistics.by.status = histogram(state);
}

/// Alerts implied by a histogram
pub fn evaluate_alerts(histogram: &BTreeMap<String, usize>) -> Vec<String> {
    let mut alerts = Vec::new();
    if !histogram.contains_key(AVAILABLE) {
        alerts.push(NO_AGENTS_AVAILABLE.to_string());
    }
    alerts
}

/// Rebuild `alerts` from the current histogram
pub fn apply_alerts(state: &mut CallCenterState) {
    state.alerts = evaluate_alerts(&state.statistics.by.status);
    for alert in &state.alerts {
        warn!(agents = state.agents.len(), "Alert raised: {}", alert);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::StdRandomSource;
    use crate::status::{StatusCatalog, TALKING};

    fn state_with(statuses: &[&str]) -> CallCenterState {
        let mut state = CallCenterState::default();
        let mut rng = StdRandomSource::seeded(5);
        crate::population::initialize(
            &mut state,
            statuses.len(),
            &StatusCatalog::default(),
            &mut rng,
            "t",
        )
        .unwrap();
        for (agent, status) in state.agents.iter_mut().zip(statuses) {
            agent.status = status.to_string();
        }
        state
    }

    #[test]
    fn test_all_available() {
        let mut state = state_with(&[AVAILABLE, AVAILABLE, AVAILABLE]);
        aggregate(&mut state);
        apply_alerts(&mut state);

        let expected: BTreeMap<String, usize> = [(AVAILABLE.to_string(), 3)].into_iter().collect();
        assert_eq!(state.statistics.by.status, expected);
        assert!(state.alerts.is_empty());
    }

    #[test]
    fn test_none_available_raises_alert() {
        let mut state = state_with(&[TALKING, TALKING, "ON HOLD"]);
        aggregate(&mut state);
        apply_alerts(&mut state);

        assert_eq!(state.count_in(TALKING), 2);
        assert_eq!(state.count_in("ON HOLD"), 1);
        assert_eq!(state.alerts, vec![NO_AGENTS_AVAILABLE.to_string()]);
    }

    #[test]
    fn test_histogram_replaces_stale_labels() {
        let mut state = state_with(&[AVAILABLE, TALKING]);
        state.statistics.by.status.insert("GONE".to_string(), 7);
        aggregate(&mut state);
        assert!(!state.statistics.by.status.contains_key("GONE"));
        assert_eq!(state.statistics.by.status.values().sum::<usize>(), 2);
    }

    #[test]
    fn test_alerts_do_not_accumulate() {
        let mut state = state_with(&[TALKING]);
        aggregate(&mut state);
        apply_alerts(&mut state);
        apply_alerts(&mut state);
        assert_eq!(state.alerts.len(), 1);

        state.agents[0].status = AVAILABLE.to_string();
        aggregate(&mut state);
        apply_alerts(&mut state);
        assert!(state.alerts.is_empty());
    }

    #[test]
    fn test_empty_population_has_no_available_agents() {
        let mut state = CallCenterState::default();
        aggregate(&mut state);
        apply_alerts(&mut state);
        assert!(state.statistics.by.status.is_empty());
        assert_eq!(state.alerts, vec![NO_AGENTS_AVAILABLE.to_string()]);
    }
}
