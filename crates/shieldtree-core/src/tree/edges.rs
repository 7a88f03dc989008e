use crate::tree::{
    ids::{ActionId, NodeId, ObservationId},
    outcomes::ObservationTable,
    stats::ValueEstimator,
};

#[derive(Debug, Clone)]
/// represents “taking a particular action from this node.”
/// Holds the action value, its RAVE credit, and the observation children reached through it.
pub struct ActionNode<T> {
    action: ActionId,
    value: ValueEstimator<u64>,
    rave: ValueEstimator<f64>,
    children: T,
}

impl<T: ObservationTable> ActionNode<T> {
    /// Create a new action node
    pub fn new(action: ActionId, num_observations: u64) -> Self {
        ActionNode {
            action,
            value: ValueEstimator::new(),
            rave: ValueEstimator::new(),
            children: T::new(num_observations),
        }
    }

    /// Getter for the actionId
    pub fn action(&self) -> ActionId {
        self.action
    }

    pub fn value(&self) -> &ValueEstimator<u64> {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut ValueEstimator<u64> {
        &mut self.value
    }

    /// All-moves-as-first credit for this action.
    pub fn rave(&self) -> &ValueEstimator<f64> {
        &self.rave
    }

    pub fn rave_mut(&mut self) -> &mut ValueEstimator<f64> {
        &mut self.rave
    }

    /// Mean value, blended with the RAVE mean when `rave_constant` is given and RAVE has samples.
    ///
    /// The blend weight is `n2 / (n + n2 + c * n * n2)` with `n` the visit count and `n2` the RAVE count.
    pub fn blended_value(&self, rave_constant: Option<f64>) -> f64 {
        let q = self.value.mean();
        match rave_constant {
            Some(c) if !self.rave.is_unvisited() => {
                let n = self.value.count() as f64;
                let n2 = self.rave.count();
                let beta = n2 / (n + n2 + c * n * n2);
                (1.0 - beta) * q + beta * self.rave.mean()
            }
            _ => q,
        }
    }

    /// Find the next node associated to this observation
    /// If found returns `Some(NodeId)` else None
    pub fn child(&self, observation: ObservationId) -> Option<NodeId> {
        self.children.child(observation)
    }

    pub fn children(&self) -> &T {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut T {
        &mut self.children
    }

    /// Return the amount of times this action has been visited
    pub fn visits(&self) -> u64 {
        self.value.count()
    }
}
