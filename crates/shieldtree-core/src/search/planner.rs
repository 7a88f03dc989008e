use std::{fmt, sync::Arc};

use rand::{Rng, SeedableRng, seq::SliceRandom};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace, warn};

use crate::{
    search::{
        config::SearchConfig,
        domain::Domain,
        error::SearchError,
        knowledge::apply_prior,
        rollout::{RolloutParams, rollout},
        ucb::UcbTable,
    },
    tree::{
        belief::BeliefState,
        error::TreeError,
        history::History,
        ids::{ActionId, NodeId, ObservationId},
        node::ObservationNode,
        outcomes::{DenseObservations, ObservationTable},
        search_tree::BeliefTree,
        stats::RunningStat,
    },
};

/// Outcome of advancing the belief with a real step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeliefUpdate {
    /// The tree was re-rooted under the real branch.
    Survived { matched: usize, transformed: usize },
    /// No particle explains the real observation. The tree is no longer usable.
    Deprived,
}

impl BeliefUpdate {
    pub fn survived(&self) -> bool {
        matches!(self, BeliefUpdate::Survived { .. })
    }
}

/// Per-search statistics, cleared at the start of every search call.
#[derive(Debug, Clone, Default)]
pub struct SearchStats {
    pub tree_depth: RunningStat,
    pub rollout_depth: RunningStat,
    pub total_reward: RunningStat,
}

impl SearchStats {
    pub fn clear(&mut self) {
        self.tree_depth.clear();
        self.rollout_depth.clear();
        self.total_reward.clear();
    }
}

type Node<D, T> = ObservationNode<<D as Domain>::State, <D as Domain>::Stats, T>;

/// Belief tree planner.
///
/// Owns the domain model, the tree, the real history and the random source.
/// `T` picks the child table: dense for small observation spaces, sparse otherwise.
pub struct Planner<D: Domain, T = DenseObservations> {
    domain: D,
    config: SearchConfig,
    ucb: Arc<UcbTable>,
    tree: BeliefTree<D::State, D::Stats, T>,
    history: History,
    rng: ChaCha8Rng,
    root_candidates: Vec<ActionId>,
    tree_depth: usize,
    peak_tree_depth: usize,
    trial_start: usize,
    stats: SearchStats,
}

impl<D: Domain, T: ObservationTable> Planner<D, T> {
    /// Build a planner whose bonus table matches the configured exploration.
    pub fn new(domain: D, config: SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let exploration = resolve_exploration(&domain, &config);
        Self::build(domain, config, Arc::new(UcbTable::new(exploration)))
    }

    /// Build a planner that reuses an existing bonus table.
    /// The table's exploration constant wins over the configured one.
    pub fn with_ucb_table(
        domain: D,
        config: SearchConfig,
        ucb: Arc<UcbTable>,
    ) -> Result<Self, SearchError> {
        config.validate()?;
        Self::build(domain, config, ucb)
    }

    fn build(domain: D, config: SearchConfig, ucb: Arc<UcbTable>) -> Result<Self, SearchError> {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let history = History::new();

        let prior_state = domain.create_start_state(&mut rng);
        let mut root: Node<D, T> = ObservationNode::new(
            domain.num_actions(),
            domain.num_observations(),
            domain.belief_stats(),
        );
        apply_prior(
            &domain,
            &config.knowledge,
            Some(&prior_state),
            &history,
            &mut root,
        )?;
        for _ in 0..config.num_start_states {
            root.belief_mut()
                .add_particle(domain.create_start_state(&mut rng));
        }

        let tree = BeliefTree::new(root, domain.num_observations(), config.node_capacity)?;
        debug!(
            num_actions = domain.num_actions(),
            num_observations = domain.num_observations(),
            start_states = config.num_start_states,
            exploration = ucb.exploration(),
            "planner created"
        );

        Ok(Planner {
            domain,
            config,
            ucb,
            tree,
            history,
            rng,
            root_candidates: Vec::new(),
            tree_depth: 0,
            peak_tree_depth: 0,
            trial_start: 0,
            stats: SearchStats::default(),
        })
    }

    /// Run a full search from the current root and return the greedy action.
    pub fn select_action(&mut self) -> Result<ActionId, SearchError> {
        if self.config.disable_tree {
            self.rollout_search()?;
        } else {
            self.uct_search()?;
        }

        self.tree_depth = 0;
        self.greedy_ucb(self.tree.root_id(), false)
    }

    /// Run `num_simulations` trials through the tree.
    /// The shield is evaluated against the current root belief first.
    pub fn uct_search(&mut self) -> Result<(), SearchError> {
        self.shield_root()?;
        self.stats.clear();
        let mut history = std::mem::take(&mut self.history);
        let outcome = self.run_trials(&mut history);
        self.history = history;
        outcome?;

        debug!(
            simulations = self.config.num_simulations,
            tree_depth = self.stats.tree_depth.mean(),
            rollout_depth = self.stats.rollout_depth.mean(),
            total_reward = self.stats.total_reward.mean(),
            nodes = self.tree.node_count(),
            "search finished"
        );
        Ok(())
    }

    fn run_trials(&mut self, history: &mut History) -> Result<(), SearchError> {
        for _ in 0..self.config.num_simulations {
            self.run_trial(history)?;
        }
        Ok(())
    }

    /// One simulation from a sampled root particle. The history is restored on every exit path.
    pub(crate) fn run_trial(&mut self, history: &mut History) -> Result<f64, SearchError> {
        let root = self.tree.root_id();
        let mut state = self
            .tree
            .root()?
            .belief()
            .sample(&mut self.rng)
            .ok_or(SearchError::EmptyBelief)?;
        self.domain.validate(&state)?;

        let mut trial = history.trial();
        self.trial_start = trial.base();
        self.tree_depth = 0;
        self.peak_tree_depth = 0;

        let total_reward = self.simulate_node(&mut state, root, &mut trial)?;
        self.stats.total_reward.add(total_reward);
        self.stats.tree_depth.add(self.peak_tree_depth as f64);
        trace!(
            total_reward,
            peak_tree_depth = self.peak_tree_depth,
            "simulation finished"
        );
        Ok(total_reward)
    }

    fn simulate_node(
        &mut self,
        state: &mut D::State,
        node_id: NodeId,
        history: &mut History,
    ) -> Result<f64, SearchError> {
        let action = self.greedy_ucb(node_id, true)?;

        self.peak_tree_depth = self.tree_depth;
        if self.tree_depth >= self.config.max_depth {
            return Ok(0.0);
        }

        if self.tree_depth == 1 {
            self.tree
                .node_mut(node_id)?
                .belief_mut()
                .add_particle(state.clone());
        }

        let total_reward = self.simulate_action(state, node_id, action, history)?;
        self.tree.node_mut(node_id)?.value_mut().add(total_reward);
        if self.config.use_rave {
            self.add_rave(node_id, total_reward, history)?;
        }
        Ok(total_reward)
    }

    fn simulate_action(
        &mut self,
        state: &mut D::State,
        node_id: NodeId,
        action: ActionId,
        history: &mut History,
    ) -> Result<f64, SearchError> {
        let outcome = self.domain.step(state, action, &mut self.rng);
        history.add(action, outcome.observation);

        let (mut child, visits) = {
            let action_node = self.tree.action(node_id, action)?;
            (action_node.child(outcome.observation), action_node.visits())
        };

        if child.is_none() && !outcome.terminal && visits >= self.config.expand_count {
            let node = self.expand_node(Some(&*state), history)?;
            let child_id = self
                .tree
                .insert_child(node_id, action, outcome.observation, node)?;
            trace!(
                parent = %node_id,
                action = action.index(),
                observation = outcome.observation.value(),
                child = %child_id,
                "expanded node"
            );
            child = Some(child_id);
        }

        let mut delayed_reward = 0.0;
        if !outcome.terminal {
            self.tree_depth += 1;
            let result = match child {
                Some(child_id) => self.simulate_node(state, child_id, history),
                None => self.rollout(state, history),
            };
            self.tree_depth -= 1;
            delayed_reward = result?;
        }

        let total_reward = outcome.reward + self.domain.discount() * delayed_reward;
        self.tree
            .action_mut(node_id, action)?
            .value_mut()
            .add(total_reward);
        Ok(total_reward)
    }

    /// Credit every action taken from this depth on in the current trial, discounted per step.
    fn add_rave(
        &mut self,
        node_id: NodeId,
        total_reward: f64,
        history: &History,
    ) -> Result<(), SearchError> {
        let rave_discount = self.config.rave_discount;
        let start = self.trial_start + self.tree_depth;
        let node = self.tree.node_mut(node_id)?;

        let mut weight = 1.0;
        for entry in history.iter().skip(start) {
            node.action_mut(entry.action)
                .ok_or(TreeError::MissingAction {
                    node_id,
                    action_id: entry.action,
                })?
                .rave_mut()
                .add_weighted(total_reward, weight);
            weight *= rave_discount;
        }
        Ok(())
    }

    fn rollout(&mut self, state: &mut D::State, history: &mut History) -> Result<f64, SearchError> {
        let params = RolloutParams {
            level: self.config.knowledge.rollout_level,
            max_depth: self.config.max_depth,
            tree_depth: self.tree_depth,
        };
        let result = rollout(&self.domain, state, history, params, &mut self.rng)?;
        self.stats.rollout_depth.add(result.steps as f64);
        trace!(
            steps = result.steps,
            total_reward = result.total_reward,
            terminal = result.terminal,
            "rollout finished"
        );
        Ok(result.total_reward)
    }

    /// Flat comparison of the legal root actions by rollouts, without growing the tree.
    ///
    /// One-ply children are still kept with the sampled particles so that a later
    /// belief update finds them.
    pub fn rollout_search(&mut self) -> Result<(), SearchError> {
        self.shield_root()?;
        self.stats.clear();
        let mut history = std::mem::take(&mut self.history);
        let outcome = self.run_rollout_search(&mut history);
        self.history = history;
        outcome
    }

    fn run_rollout_search(&mut self, history: &mut History) -> Result<(), SearchError> {
        let root = self.tree.root_id();
        let first = self
            .tree
            .root()?
            .belief()
            .particle(0)
            .cloned()
            .ok_or(SearchError::EmptyBelief)?;
        let mut legal = self.domain.generate_legal(&first, history);
        self.check_actions(&legal)?;
        if legal.is_empty() {
            return Err(SearchError::NoLegalActions { node_id: root });
        }
        legal.shuffle(&mut self.rng);

        for i in 0..self.config.num_simulations {
            let action = legal[i % legal.len()];
            let mut state = self
                .tree
                .root()?
                .belief()
                .sample(&mut self.rng)
                .ok_or(SearchError::EmptyBelief)?;
            self.domain.validate(&state)?;

            let mut trial = history.trial();
            self.trial_start = trial.base();
            self.tree_depth = 0;

            let outcome = self.domain.step(&mut state, action, &mut self.rng);
            if self.tree.child(root, action, outcome.observation)?.is_none() && !outcome.terminal
            {
                let mut node = self.expand_node(Some(&state), &trial)?;
                node.belief_mut().add_particle(state.clone());
                self.tree
                    .insert_child(root, action, outcome.observation, node)?;
            }
            trial.add(action, outcome.observation);

            let mut delayed_reward = 0.0;
            if !outcome.terminal {
                self.tree_depth = 1;
                let result = self.rollout(&mut state, &mut trial);
                self.tree_depth = 0;
                delayed_reward = result?;
            }

            let total_reward = outcome.reward + self.domain.discount() * delayed_reward;
            self.tree
                .action_mut(root, action)?
                .value_mut()
                .add(total_reward);
            self.stats.total_reward.add(total_reward);
        }

        debug!(
            simulations = self.config.num_simulations,
            legal = legal.len(),
            rollout_depth = self.stats.rollout_depth.mean(),
            "rollout search finished"
        );
        Ok(())
    }

    /// Advance the belief with the real `(action, observation)` and re-root the tree.
    ///
    /// The reward is not needed by the particle filter; it is accepted for symmetry with the real step.
    /// When an error is returned the history and the matched child's particles are left as they were.
    pub fn update(
        &mut self,
        action: ActionId,
        observation: ObservationId,
        _reward: f64,
    ) -> Result<BeliefUpdate, SearchError> {
        self.check_actions(&[action])?;

        let root = self.tree.root_id();
        let matched_child = self.tree.child(root, action, observation)?;
        let fresh = BeliefState::new(self.domain.belief_stats());
        let matched_belief = match matched_child {
            Some(child) => std::mem::replace(self.tree.node_mut(child)?.belief_mut(), fresh),
            None => fresh,
        };

        self.history.add(action, observation);
        let staged = match self.stage_root(&matched_belief) {
            Ok(staged) => staged,
            Err(err) => {
                self.history.pop();
                if let Some(child) = matched_child {
                    *self.tree.node_mut(child)?.belief_mut() = matched_belief;
                }
                return Err(err);
            }
        };

        let Some((mut new_root, transforms)) = staged else {
            warn!(
                action = action.index(),
                observation = observation.value(),
                history_len = self.history.len(),
                "particle deprivation, no particle explains the real observation"
            );
            return Ok(BeliefUpdate::Deprived);
        };

        let matched = matched_belief.len();
        let transformed = transforms.len();
        new_root.belief_mut().absorb(transforms);
        new_root.belief_mut().absorb(matched_belief);
        let particles = new_root.belief().len();
        self.tree.reroot(new_root)?;

        debug!(
            action = action.index(),
            observation = observation.value(),
            matched,
            transformed,
            particles,
            "belief updated"
        );
        Ok(BeliefUpdate::Survived {
            matched,
            transformed,
        })
    }

    /// Build the next root without touching the tree: reinvigorating transforms and a
    /// node whose priors come from the first surviving particle. `None` when no particle survives.
    fn stage_root(
        &mut self,
        matched: &BeliefState<D::State, D::Stats>,
    ) -> Result<Option<(Node<D, T>, BeliefState<D::State, D::Stats>)>, SearchError> {
        let mut transforms = BeliefState::new(self.domain.belief_stats());
        if self.config.use_transforms {
            self.add_transforms(&mut transforms)?;
        }

        let Some(prior_state) = matched.particle(0).or_else(|| transforms.particle(0)).cloned()
        else {
            return Ok(None);
        };
        let new_root = self.expand_node(Some(&prior_state), &self.history)?;
        Ok(Some((new_root, transforms)))
    }

    /// Reinvigorate `belief` with local transformations of old root particles.
    fn add_transforms(
        &mut self,
        belief: &mut BeliefState<D::State, D::Stats>,
    ) -> Result<(), SearchError> {
        let Some(last) = self.history.back().copied() else {
            return Ok(());
        };

        let mut attempts = 0;
        let mut added = 0;
        while added < self.config.num_transforms && attempts < self.config.max_attempts {
            if let Some(transform) = self.create_transform(last.action)? {
                belief.add_particle(transform);
                added += 1;
            }
            attempts += 1;
        }

        debug!(added, attempts, "local transformations");
        Ok(())
    }

    fn create_transform(&mut self, action: ActionId) -> Result<Option<D::State>, SearchError> {
        let mut state = self
            .tree
            .root()?
            .belief()
            .sample(&mut self.rng)
            .ok_or(SearchError::EmptyBelief)?;
        let outcome = self.domain.step(&mut state, action, &mut self.rng);
        let accepted =
            self.domain
                .local_move(&mut state, &self.history, outcome.observation, &mut self.rng);
        Ok(accepted.then_some(state))
    }

    /// Pick the best action at `node_id`, with the UCB bonus when `explore` is set.
    ///
    /// At the root of a shielded search only the shield's actions are candidates.
    /// Ties are broken uniformly at random.
    pub(crate) fn greedy_ucb(
        &mut self,
        node_id: NodeId,
        explore: bool,
    ) -> Result<ActionId, SearchError> {
        let node = self.tree.node(node_id)?;
        let node_visits = node.value().count();
        let restricted = self.config.use_shield && self.tree_depth == 0;
        let rave_constant = self.config.use_rave.then_some(self.config.rave_constant);
        let has_alpha = self.domain.has_alpha();

        let mut best = Vec::new();
        let mut best_q = f64::NEG_INFINITY;
        for action_node in node.actions() {
            let action = action_node.action();
            if restricted && !self.root_candidates.contains(&action) {
                continue;
            }

            let n = action_node.visits();
            let mut q = action_node.blended_value(rave_constant);

            if has_alpha && n > 0 {
                let (alpha_q, alpha_n) = self.domain.alpha_value(action)?;
                q = (n as f64 * q + alpha_n as f64 * alpha_q) / (n + alpha_n) as f64;
            }

            if explore {
                q += self.ucb.bonus(node_visits, n);
            }

            if q >= best_q {
                if q > best_q {
                    best.clear();
                }
                best_q = q;
                best.push(action);
            }
        }

        if best.is_empty() {
            return Err(SearchError::NoLegalActions { node_id });
        }
        Ok(best[self.rng.gen_range(0..best.len())])
    }

    fn expand_node(
        &self,
        state: Option<&D::State>,
        history: &History,
    ) -> Result<Node<D, T>, SearchError> {
        let mut node = self.tree.new_node(self.domain.belief_stats());
        apply_prior(&self.domain, &self.config.knowledge, state, history, &mut node)?;
        Ok(node)
    }

    /// Recompute the shield's action set from the current root belief.
    fn shield_root(&mut self) -> Result<(), SearchError> {
        self.root_candidates.clear();
        if !self.config.use_shield {
            return Ok(());
        }

        let candidates = self.domain.pre_shield(self.tree.root()?.belief());
        self.check_actions(&candidates)?;
        debug!(candidates = ?candidates, "shield evaluated");
        self.root_candidates = candidates;
        Ok(())
    }

    fn check_actions(&self, actions: &[ActionId]) -> Result<(), SearchError> {
        let num_actions = self.domain.num_actions();
        match actions.iter().find(|action| action.index() >= num_actions) {
            Some(action) => Err(SearchError::InvalidAction {
                action: *action,
                num_actions,
            }),
            None => Ok(()),
        }
    }

    pub fn domain(&self) -> &D {
        &self.domain
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn exploration(&self) -> f64 {
        self.ucb.exploration()
    }

    pub fn ucb_table(&self) -> &Arc<UcbTable> {
        &self.ucb
    }

    pub fn tree(&self) -> &BeliefTree<D::State, D::Stats, T> {
        &self.tree
    }

    #[cfg(test)]
    pub(crate) fn tree_mut(&mut self) -> &mut BeliefTree<D::State, D::Stats, T> {
        &mut self.tree
    }

    /// Real history since the planner was created.
    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    pub fn root_belief(&self) -> Result<&BeliefState<D::State, D::Stats>, SearchError> {
        Ok(self.tree.root()?.belief())
    }

    /// Actions the shield admitted in the latest search; empty when shielding is off.
    pub fn shield_actions(&self) -> &[ActionId] {
        &self.root_candidates
    }
}

impl<D: Domain, T: ObservationTable> fmt::Debug for Planner<D, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Planner")
            .field("config", &self.config)
            .field("exploration", &self.ucb.exploration())
            .field("root", &self.tree.root_id())
            .field("node_count", &self.tree.node_count())
            .field("history_len", &self.history.len())
            .finish_non_exhaustive()
    }
}

fn resolve_exploration<D: Domain>(domain: &D, config: &SearchConfig) -> f64 {
    if !config.auto_exploration {
        config.exploration_constant
    } else if config.use_rave {
        0.0
    } else {
        domain.reward_range()
    }
}
