//! Per-tick status sampling

use tracing::{debug, trace};

use crate::error::{EngineError, EngineResult};
use crate::random::RandomSource;
use crate::state::{CallCenterState, CallCounters};
use crate::status::{StatusCatalog, NOT_AVAILABLE, TALKING};

/// What a sampling pass touched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleOutcome {
    /// First-stage draw from `[0, population]`
    pub sample_bound: usize,
    /// Indices of the agents that were reassigned
    pub selected: Vec<usize>,
}

/// Counter effect of moving into `status`
fn record_call(status: &str, agent: &mut CallCounters, total: &mut CallCounters) {
    if status == TALKING {
        agent.accepted += 1;
        total.accepted += 1;
    } else if status == NOT_AVAILABLE {
        agent.rejected += 1;
        total.rejected += 1;
    }
}

/// Put agent `index` into `status` and update call counters.
///
/// The status is applied even if it equals the current one; the change time
/// and counters move either way.
pub fn apply_status(
    state: &mut CallCenterState,
    index: usize,
    status: &str,
    timestamp: &str,
) -> EngineResult<()> {
    let CallCenterState {
        agents, statistics, ..
    } = state;
    let agent = agents
        .get_mut(index)
        .ok_or_else(|| EngineError::internal(format!("agent index {} out of range", index)))?;

    trace!(agent = %agent.agent, from = %agent.status, to = %status, "Status change");
    agent.status = status.to_string();
    agent.state_change_time = timestamp.to_string();
    record_call(status, &mut agent.statistics.by.calls, &mut statistics.by.calls);
    Ok(())
}

/// Pick a random subset of agents and give each a random status.
///
/// The subset size comes from a two-stage draw: a bound in
/// `[0, population]`, then a size in `[0, bound / 2]`. Clears `alerts`
/// so the alert pass later in the tick starts from nothing.
pub fn sample(
    state: &mut CallCenterState,
    statuses: &StatusCatalog,
    rng: &mut dyn RandomSource,
    timestamp: &str,
) -> EngineResult<SampleOutcome> {
    let population = state.agents.len();
    let sample_bound = rng.range_inclusive(0, population as u64) as usize;
    let sample_size = rng.range_inclusive(0, (sample_bound / 2) as u64) as usize;
    let selected = rng.sample_indices(population, sample_size);

    state.alerts.clear();

    for &index in &selected {
        let status = statuses.pick(rng)?;
        apply_status(state, index, status, timestamp)?;
    }

    debug!(
        population,
        sample_bound,
        selected = selected.len(),
        "Sampled agents for status changes"
    );

    Ok(SampleOutcome {
        sample_bound,
        selected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::StdRandomSource;

    fn population(n: usize) -> CallCenterState {
        let mut state = CallCenterState::default();
        let mut rng = StdRandomSource::seeded(21);
        crate::population::initialize(&mut state, n, &StatusCatalog::default(), &mut rng, "t0")
            .unwrap();
        state
    }

    #[test]
    fn test_talking_counts_as_accepted() {
        let mut state = population(3);
        apply_status(&mut state, 1, TALKING, "t1").unwrap();
        assert_eq!(state.agents[1].status, TALKING);
        assert_eq!(state.agents[1].state_change_time, "t1");
        assert_eq!(state.agents[1].calls().accepted, 1);
        assert_eq!(state.calls().accepted, 1);
        assert_eq!(state.calls().rejected, 0);
    }

    #[test]
    fn test_not_available_counts_as_rejected() {
        let mut state = population(3);
        apply_status(&mut state, 2, NOT_AVAILABLE, "t1").unwrap();
        apply_status(&mut state, 2, NOT_AVAILABLE, "t2").unwrap();
        assert_eq!(state.agents[2].calls().rejected, 2);
        assert_eq!(state.calls().rejected, 2);
        assert_eq!(state.agents[2].state_change_time, "t2");
    }

    #[test]
    fn test_other_status_has_no_counter_effect() {
        let mut state = population(2);
        apply_status(&mut state, 0, "ON HOLD", "t1").unwrap();
        assert_eq!(*state.calls(), CallCounters::default());
        assert_eq!(*state.agents[0].calls(), CallCounters::default());
    }

    #[test]
    fn test_out_of_range_index_fails() {
        let mut state = population(1);
        assert!(apply_status(&mut state, 5, TALKING, "t").is_err());
    }

    #[test]
    fn test_sample_never_exceeds_half_the_population() {
        let mut state = population(20);
        let statuses = StatusCatalog::default();
        let mut rng = StdRandomSource::seeded(8);
        for _ in 0..200 {
            let outcome = sample(&mut state, &statuses, &mut rng, "t").unwrap();
            assert!(outcome.sample_bound <= 20);
            assert!(outcome.selected.len() <= outcome.sample_bound / 2);
        }
    }

    #[test]
    fn test_sample_clears_alerts_and_leaves_others_alone() {
        let mut state = population(10);
        state.alerts.push("stale".to_string());
        let before = state.agents.clone();

        let statuses = StatusCatalog::default();
        let mut rng = StdRandomSource::seeded(4);
        let outcome = sample(&mut state, &statuses, &mut rng, "later").unwrap();

        assert!(state.alerts.is_empty());
        for (index, agent) in state.agents.iter().enumerate() {
            if outcome.selected.contains(&index) {
                assert_eq!(agent.state_change_time, "later");
            } else {
                assert_eq!(agent, &before[index]);
            }
        }
    }
}
