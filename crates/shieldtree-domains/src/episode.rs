use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use shieldtree_core::{
    ActionId, BeliefUpdate, Domain, ObservationId, ObservationTable, Planner, select_random,
};
use tracing::{debug, info, warn};

use crate::DomainsError;

/// Settings for one episode against the real environment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpisodeConfig {
    /// Real steps before the episode is cut off.
    pub num_steps: usize,
    /// Seed for the real environment, independent of the planner's generator.
    pub seed: u64,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        EpisodeConfig {
            num_steps: 100,
            seed: 0,
        }
    }
}

/// One real step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeStep {
    pub action: ActionId,
    pub observation: ObservationId,
    pub reward: f64,
    /// Chosen by the rollout policy after the planner lost its belief.
    pub fallback: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeResult {
    pub undiscounted_return: f64,
    pub discounted_return: f64,
    pub steps: Vec<EpisodeStep>,
    pub terminated: bool,
    /// Step at which the belief update ran out of particles, if it did.
    pub deprived_at: Option<usize>,
}

impl EpisodeResult {
    pub fn num_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn ran_out_of_particles(&self) -> bool {
        self.deprived_at.is_some()
    }
}

/// Play one episode: plan, act on a hidden real state, feed the observation back.
///
/// When the belief update is deprived the remaining steps are chosen by the
/// rollout policy on the real state, since the planner has nothing left to search.
pub fn run_episode<D, T>(
    planner: &mut Planner<D, T>,
    config: &EpisodeConfig,
) -> Result<EpisodeResult, DomainsError>
where
    D: Domain,
    T: ObservationTable,
{
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let discount = planner.domain().discount();
    let mut state = planner.domain().create_start_state(&mut rng);

    let mut result = EpisodeResult {
        undiscounted_return: 0.0,
        discounted_return: 0.0,
        steps: Vec::new(),
        terminated: false,
        deprived_at: None,
    };
    let mut weight = 1.0;

    let mut t = 0;
    while t < config.num_steps {
        let action = planner.select_action()?;
        let outcome = planner.domain().step(&mut state, action, &mut rng);
        debug!(
            step = t,
            action = %action,
            observation = %outcome.observation,
            reward = outcome.reward,
            "real step"
        );

        result.undiscounted_return += outcome.reward;
        result.discounted_return += outcome.reward * weight;
        weight *= discount;
        result.steps.push(EpisodeStep {
            action,
            observation: outcome.observation,
            reward: outcome.reward,
            fallback: false,
        });

        if outcome.terminal {
            result.terminated = true;
            break;
        }

        let update = planner.update(action, outcome.observation, outcome.reward)?;
        if let BeliefUpdate::Deprived = update {
            warn!(step = t, "belief deprived, finishing the episode with the rollout policy");
            result.deprived_at = Some(t);
            break;
        }
        t += 1;
    }

    if result.deprived_at.is_some() {
        let level = planner.config().knowledge.rollout_level;
        let mut history = planner.history().clone();
        t += 1;
        while t < config.num_steps {
            let action = select_random(planner.domain(), level, &state, &history, &mut rng);
            let outcome = planner.domain().step(&mut state, action, &mut rng);
            history.add(action, outcome.observation);

            result.undiscounted_return += outcome.reward;
            result.discounted_return += outcome.reward * weight;
            weight *= discount;
            result.steps.push(EpisodeStep {
                action,
                observation: outcome.observation,
                reward: outcome.reward,
                fallback: true,
            });

            if outcome.terminal {
                result.terminated = true;
                break;
            }
            t += 1;
        }
    }

    info!(
        steps = result.steps.len(),
        undiscounted = result.undiscounted_return,
        discounted = result.discounted_return,
        terminated = result.terminated,
        deprived = result.deprived_at.is_some(),
        "episode finished"
    );
    Ok(result)
}
