use rand::Rng;
use thiserror::Error;

use crate::{
    search::shield::all_actions,
    tree::{
        belief::{BeliefState, BeliefStats},
        history::History,
        ids::{ActionId, ObservationId},
    },
};

/// Result of one stochastic transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub observation: ObservationId,
    pub reward: f64,
    pub terminal: bool,
}

impl StepOutcome {
    pub fn new(observation: impl Into<ObservationId>, reward: f64, terminal: bool) -> Self {
        StepOutcome {
            observation: observation.into(),
            reward,
            terminal,
        }
    }
}

/// Failures reported by a domain model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// An optional hook the domain does not provide.
    #[error("operation `{operation}` is not supported by this domain")]
    Unsupported { operation: &'static str },
    /// A sampled particle failed the domain's sanity check.
    #[error("invalid state: {reason}")]
    InvalidState { reason: String },
}

/// Generative model of a partially observable problem.
///
/// Particles are plain values: `Clone` is the deep copy and dropping a
/// particle frees it. Every random draw goes through the generator passed in,
/// so a seeded generator makes a whole run reproducible.
pub trait Domain {
    type State: Clone + std::fmt::Debug;
    type Stats: BeliefStats<Self::State> + std::fmt::Debug;

    fn num_actions(&self) -> usize;

    fn num_observations(&self) -> u64;

    fn discount(&self) -> f64 {
        1.0
    }

    /// Spread between the best and worst single-step reward.
    fn reward_range(&self) -> f64 {
        1.0
    }

    /// Draw a state from the initial distribution.
    fn create_start_state<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::State;

    /// Advance `state` in place under `action`.
    fn step<R: Rng + ?Sized>(
        &self,
        state: &mut Self::State,
        action: ActionId,
        rng: &mut R,
    ) -> StepOutcome;

    fn validate(&self, _state: &Self::State) -> Result<(), DomainError> {
        Ok(())
    }

    /// Actions allowed in `state`. Every reachable state must expose at least one.
    fn generate_legal(&self, _state: &Self::State, _history: &History) -> Vec<ActionId> {
        all_actions(self.num_actions())
    }

    /// Actions worth trying first in `state`.
    fn generate_preferred(&self, _state: &Self::State, _history: &History) -> Vec<ActionId> {
        Vec::new()
    }

    /// Perturb a transformed particle and decide whether it stays consistent with `history`.
    ///
    /// `step_observation` is what the particle produced when the last real action was replayed on it.
    fn local_move<R: Rng + ?Sized>(
        &self,
        _state: &mut Self::State,
        _history: &History,
        _step_observation: ObservationId,
        _rng: &mut R,
    ) -> bool {
        true
    }

    /// Fresh, empty summary for a new belief state.
    fn belief_stats(&self) -> Self::Stats;

    /// Actions the planner may commit to from `belief`. Must not be empty.
    fn pre_shield(&self, _belief: &BeliefState<Self::State, Self::Stats>) -> Vec<ActionId> {
        all_actions(self.num_actions())
    }

    fn has_alpha(&self) -> bool {
        false
    }

    /// Explicit value estimate `(value, count)` for an action, for domains that can compute one.
    fn alpha_value(&self, _action: ActionId) -> Result<(f64, u64), DomainError> {
        Err(DomainError::Unsupported {
            operation: "alpha_value",
        })
    }
}
