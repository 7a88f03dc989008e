use crate::tree::{
    belief::{BeliefState, BeliefStats},
    edges::ActionNode,
    ids::ActionId,
    outcomes::ObservationTable,
    stats::ValueEstimator,
};

#[derive(Debug, Clone)]
/// represents a belief point in the search tree, reached by an action/observation history.
/// Owns the particles that simulations deposited here and one action node per domain action.
pub struct ObservationNode<S, B, T> {
    value: ValueEstimator<u64>,
    belief: BeliefState<S, B>,
    actions: Vec<ActionNode<T>>,
}

impl<S, B: BeliefStats<S>, T: ObservationTable> ObservationNode<S, B, T> {
    /// Create a node with zeroed statistics and an empty belief.
    pub fn new(num_actions: usize, num_observations: u64, stats: B) -> Self {
        ObservationNode {
            value: ValueEstimator::new(),
            belief: BeliefState::new(stats),
            actions: (0..num_actions)
                .map(|i| ActionNode::new(ActionId::from(i), num_observations))
                .collect(),
        }
    }

    /// Overwrite every action value with the same prior.
    pub fn set_children(&mut self, count: u64, value: f64) {
        for action in &mut self.actions {
            action.value_mut().set(count, value);
        }
    }

    pub fn value(&self) -> &ValueEstimator<u64> {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut ValueEstimator<u64> {
        &mut self.value
    }

    pub fn belief(&self) -> &BeliefState<S, B> {
        &self.belief
    }

    pub fn belief_mut(&mut self) -> &mut BeliefState<S, B> {
        &mut self.belief
    }

    /// Using an action id, return the corresponding action node
    pub fn action(&self, action_id: ActionId) -> Option<&ActionNode<T>> {
        self.actions.get(action_id.index())
    }

    /// Using an action id, return the corresponding action node as mutable
    pub fn action_mut(&mut self, action_id: ActionId) -> Option<&mut ActionNode<T>> {
        self.actions.get_mut(action_id.index())
    }

    pub fn actions(&self) -> &[ActionNode<T>] {
        &self.actions
    }

    pub fn num_actions(&self) -> usize {
        self.actions.len()
    }
}
