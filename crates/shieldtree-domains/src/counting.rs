use rand::Rng;
use shieldtree_core::{ActionId, Domain, StepOutcome};

/// Reference problem for checking search quality.
///
/// Action 0 pays 1 on each of the first `max_depth` steps, every other action
/// pays nothing, and observations are uniform noise. Episodes never end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountingSimulator {
    actions: usize,
    observations: u64,
    max_depth: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountingState {
    pub depth: usize,
}

impl CountingSimulator {
    pub fn new(actions: usize, observations: u64, max_depth: usize) -> Self {
        CountingSimulator {
            actions,
            observations,
            max_depth,
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Return of always taking action 0.
    pub fn optimal_value(&self) -> f64 {
        self.max_depth as f64
    }

    /// Expected return of the uniform random policy.
    pub fn mean_value(&self) -> f64 {
        self.max_depth as f64 / self.actions as f64
    }
}

impl Domain for CountingSimulator {
    type State = CountingState;
    type Stats = ();

    fn num_actions(&self) -> usize {
        self.actions
    }

    fn num_observations(&self) -> u64 {
        self.observations
    }

    fn create_start_state<R: Rng + ?Sized>(&self, _rng: &mut R) -> CountingState {
        CountingState { depth: 0 }
    }

    fn step<R: Rng + ?Sized>(
        &self,
        state: &mut CountingState,
        action: ActionId,
        rng: &mut R,
    ) -> StepOutcome {
        let reward = if action.index() == 0 && state.depth < self.max_depth {
            1.0
        } else {
            0.0
        };
        state.depth += 1;
        StepOutcome::new(rng.gen_range(0..self.observations), reward, false)
    }

    fn belief_stats(&self) {}
}
