use std::sync::{Arc, OnceLock};

use rand::Rng;

use crate::{
    search::{
        config::SearchConfig,
        domain::{Domain, StepOutcome},
        ucb::UcbTable,
    },
    tree::{
        belief::BeliefState,
        history::History,
        ids::{ActionId, ObservationId},
    },
};

/// Action 0 pays 1 until `depth_limit` steps have been taken; observations are noise.
#[derive(Debug, Clone)]
pub struct CountingDomain {
    pub actions: usize,
    pub observations: u64,
    pub depth_limit: usize,
    pub shield: Option<Vec<ActionId>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Steps(pub usize);

impl CountingDomain {
    pub fn new(actions: usize, observations: u64, depth_limit: usize) -> Self {
        CountingDomain {
            actions,
            observations,
            depth_limit,
            shield: None,
        }
    }

    pub fn optimal_value(&self) -> f64 {
        self.depth_limit as f64
    }

    pub fn mean_value(&self) -> f64 {
        self.depth_limit as f64 / self.actions as f64
    }
}

impl Domain for CountingDomain {
    type State = Steps;
    type Stats = ();

    fn num_actions(&self) -> usize {
        self.actions
    }

    fn num_observations(&self) -> u64 {
        self.observations
    }

    fn create_start_state<R: Rng + ?Sized>(&self, _rng: &mut R) -> Self::State {
        Steps(0)
    }

    fn step<R: Rng + ?Sized>(
        &self,
        state: &mut Self::State,
        action: ActionId,
        rng: &mut R,
    ) -> StepOutcome {
        let reward = if action.index() == 0 && state.0 < self.depth_limit {
            1.0
        } else {
            0.0
        };
        state.0 += 1;
        StepOutcome::new(rng.gen_range(0..self.observations), reward, false)
    }

    fn belief_stats(&self) -> Self::Stats {}

    fn pre_shield(&self, _belief: &BeliefState<Self::State, Self::Stats>) -> Vec<ActionId> {
        match &self.shield {
            Some(actions) => actions.clone(),
            None => crate::search::shield::all_actions(self.actions),
        }
    }
}

/// A hidden bit that every step reports faithfully.
/// Particles carry an id so tests can tell where each one came from.
#[derive(Debug, Clone)]
pub struct BitDomain {
    /// Probability that a start state has the bit set.
    pub p_set: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BitState {
    pub id: u64,
    pub bit: bool,
    pub transformed: bool,
}

impl Domain for BitDomain {
    type State = BitState;
    type Stats = ();

    fn num_actions(&self) -> usize {
        2
    }

    fn num_observations(&self) -> u64 {
        2
    }

    fn create_start_state<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::State {
        BitState {
            id: rng.r#gen(),
            bit: rng.gen_bool(self.p_set),
            transformed: false,
        }
    }

    fn step<R: Rng + ?Sized>(
        &self,
        state: &mut Self::State,
        _action: ActionId,
        _rng: &mut R,
    ) -> StepOutcome {
        StepOutcome::new(u64::from(state.bit), 0.0, false)
    }

    fn local_move<R: Rng + ?Sized>(
        &self,
        state: &mut Self::State,
        history: &History,
        step_observation: ObservationId,
        _rng: &mut R,
    ) -> bool {
        state.transformed = true;
        history
            .back()
            .is_some_and(|entry| entry.observation == step_observation)
    }

    fn belief_stats(&self) -> Self::Stats {}
}

pub fn small_config(num_simulations: usize, max_depth: usize) -> SearchConfig {
    SearchConfig {
        num_simulations,
        num_start_states: 64,
        max_depth,
        seed: 7,
        ..SearchConfig::default()
    }
}

/// Bonus table shared by tests that build many planners.
pub fn shared_table() -> Arc<UcbTable> {
    static TABLE: OnceLock<Arc<UcbTable>> = OnceLock::new();
    TABLE.get_or_init(|| Arc::new(UcbTable::new(1.0))).clone()
}
