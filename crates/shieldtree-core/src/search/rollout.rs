use rand::Rng;

use crate::{
    search::{
        config::KnowledgeLevel, domain::Domain, error::SearchError, knowledge::select_random,
    },
    tree::history::History,
};

/// Rollout parameters controlling the policy and the horizon.
#[derive(Debug, Clone, Copy)]
pub struct RolloutParams {
    pub level: KnowledgeLevel,
    pub max_depth: usize,
    /// Depth already spent inside the tree before the rollout starts.
    pub tree_depth: usize,
}

impl RolloutParams {
    /// Steps left before the search horizon.
    pub fn step_limit(&self) -> usize {
        self.max_depth.saturating_sub(self.tree_depth)
    }
}

/// What a rollout produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RolloutResult {
    /// Discounted sum of rewards collected.
    pub total_reward: f64,
    pub steps: usize,
    pub terminal: bool,
}

/// Run the default policy from `state` outside the tree.
///
/// Every step is appended to `history`; the caller decides when to truncate it.
pub fn rollout<D, R>(
    domain: &D,
    state: &mut D::State,
    history: &mut History,
    params: RolloutParams,
    rng: &mut R,
) -> Result<RolloutResult, SearchError>
where
    D: Domain,
    R: Rng + ?Sized,
{
    let mut total_reward = 0.0;
    let mut discount = 1.0;
    let mut terminal = false;
    let mut steps = 0;

    while steps < params.step_limit() && !terminal {
        let action = select_random(domain, params.level, state, history, rng);
        if action.index() >= domain.num_actions() {
            return Err(SearchError::InvalidAction {
                action,
                num_actions: domain.num_actions(),
            });
        }

        let outcome = domain.step(state, action, rng);
        history.add(action, outcome.observation);

        total_reward += outcome.reward * discount;
        discount *= domain.discount();
        terminal = outcome.terminal;
        steps += 1;
    }

    Ok(RolloutResult {
        total_reward,
        steps,
        terminal,
    })
}
