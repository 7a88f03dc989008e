use std::collections::VecDeque;

use crate::tree::{
    arena::Pool,
    belief::BeliefStats,
    edges::ActionNode,
    error::TreeError,
    ids::{ActionId, NodeId, ObservationId},
    node::ObservationNode,
    outcomes::{InsertRejected, ObservationTable},
    snapshot::{ActionSnapshot, NodeSnapshot, ObservationEdgeSnapshot, TreeSnapshot},
};

const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone)]
/// owns the node pool and the current root
/// Children are reached through handles stored in each action node's observation table.
pub struct BeliefTree<S, B, T> {
    pool: Pool<ObservationNode<S, B, T>>,
    root: NodeId,
    num_actions: usize,
    num_observations: u64,
}

impl<S, B: BeliefStats<S>, T: ObservationTable> BeliefTree<S, B, T> {
    /// Create a tree around an already built root node.
    /// `capacity` caps the number of live nodes; `None` lets the pool grow freely.
    pub fn new(
        root: ObservationNode<S, B, T>,
        num_observations: u64,
        capacity: Option<usize>,
    ) -> Result<Self, TreeError> {
        let mut pool = match capacity {
            Some(capacity) => Pool::with_capacity_limit(capacity),
            None => Pool::new(),
        };
        let num_actions = root.num_actions();
        let root = pool.allocate(root)?;
        Ok(BeliefTree {
            pool,
            root,
            num_actions,
            num_observations,
        })
    }

    /// Build a detached node shaped for this tree.
    pub fn new_node(&self, stats: B) -> ObservationNode<S, B, T> {
        ObservationNode::new(self.num_actions, self.num_observations, stats)
    }

    /// Return the root node id.
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    pub fn num_observations(&self) -> u64 {
        self.num_observations
    }

    /// Return how many live nodes the tree holds.
    pub fn node_count(&self) -> usize {
        self.pool.len()
    }

    /// Storage slots ever created. Stays flat when freed slots are recycled.
    pub fn slot_count(&self) -> usize {
        self.pool.slot_count()
    }

    /// Return an immutable node handle.
    pub fn node(&self, node_id: NodeId) -> Result<&ObservationNode<S, B, T>, TreeError> {
        self.pool
            .get(node_id)
            .ok_or(TreeError::MissingNode { node_id })
    }

    /// Return a mutable node handle.
    pub fn node_mut(
        &mut self,
        node_id: NodeId,
    ) -> Result<&mut ObservationNode<S, B, T>, TreeError> {
        self.pool
            .get_mut(node_id)
            .ok_or(TreeError::MissingNode { node_id })
    }

    pub fn root(&self) -> Result<&ObservationNode<S, B, T>, TreeError> {
        self.node(self.root)
    }

    pub fn root_mut(&mut self) -> Result<&mut ObservationNode<S, B, T>, TreeError> {
        self.node_mut(self.root)
    }

    pub fn action(
        &self,
        node_id: NodeId,
        action_id: ActionId,
    ) -> Result<&ActionNode<T>, TreeError> {
        self.node(node_id)?
            .action(action_id)
            .ok_or(TreeError::MissingAction { node_id, action_id })
    }

    pub fn action_mut(
        &mut self,
        node_id: NodeId,
        action_id: ActionId,
    ) -> Result<&mut ActionNode<T>, TreeError> {
        self.node_mut(node_id)?
            .action_mut(action_id)
            .ok_or(TreeError::MissingAction { node_id, action_id })
    }

    /// Look up the child reached by `action` then `observation`.
    pub fn child(
        &self,
        node_id: NodeId,
        action_id: ActionId,
        observation: ObservationId,
    ) -> Result<Option<NodeId>, TreeError> {
        Ok(self.action(node_id, action_id)?.child(observation))
    }

    /// Store `node` and attach it under `(parent, action, observation)`.
    /// On failure the node is released again and nothing in the tree changes.
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        action_id: ActionId,
        observation: ObservationId,
        node: ObservationNode<S, B, T>,
    ) -> Result<NodeId, TreeError> {
        // validate the parent before touching the pool
        self.action(parent, action_id)?;
        let child_id = self.pool.allocate(node)?;

        let inserted = self
            .action_mut(parent, action_id)
            .map(|action| action.children_mut().insert(observation, child_id));

        match inserted {
            Ok(Ok(())) => Ok(child_id),
            Ok(Err(rejected)) => {
                self.pool.free(child_id);
                Err(match rejected {
                    InsertRejected::Occupied => TreeError::ChildAlreadyPresent {
                        node_id: parent,
                        action_id,
                        observation,
                    },
                    InsertRejected::OutOfRange { num_observations } => {
                        TreeError::ObservationOutOfRange {
                            observation,
                            num_observations,
                        }
                    }
                })
            }
            Err(err) => {
                self.pool.free(child_id);
                Err(err)
            }
        }
    }

    /// Discard every node, including all particles they own, and install `root`.
    /// Every handle issued before the call becomes stale.
    pub fn reroot(&mut self, root: ObservationNode<S, B, T>) -> Result<NodeId, TreeError> {
        self.pool.free_all();
        self.root = self.pool.allocate(root)?;
        Ok(self.root)
    }

    /// Ids reachable from the root, breadth first, paired with their depth.
    /// Nodes deeper than `max_depth` are left out.
    pub fn reachable(&self, max_depth: Option<usize>) -> Result<Vec<(NodeId, usize)>, TreeError> {
        let mut order = Vec::new();
        let mut queue = VecDeque::from([(self.root, 0usize)]);

        while let Some((node_id, depth)) = queue.pop_front() {
            let node = self.node(node_id)?;
            order.push((node_id, depth));
            if max_depth.is_some_and(|limit| depth >= limit) {
                continue;
            }
            for action in node.actions() {
                for (_, child) in action.children().entries() {
                    queue.push_back((child, depth + 1));
                }
            }
        }

        Ok(order)
    }

    /// Export the statistics of every reachable node up to `max_depth`.
    pub fn snapshot(&self, max_depth: Option<usize>) -> Result<TreeSnapshot, TreeError> {
        let mut nodes = Vec::new();

        for (node_id, depth) in self.reachable(max_depth)? {
            let node = self.node(node_id)?;
            let actions = node
                .actions()
                .iter()
                .map(|action| ActionSnapshot {
                    action_id: action.action().index(),
                    visits: action.visits(),
                    value_sum: action.value().total(),
                    q: action.value().mean(),
                    rave_count: action.rave().count(),
                    rave_q: action.rave().mean(),
                    children: action
                        .children()
                        .entries()
                        .into_iter()
                        .map(|(observation, child)| ObservationEdgeSnapshot {
                            observation: observation.value(),
                            child_node_id: child.index(),
                        })
                        .collect(),
                })
                .collect();

            nodes.push(NodeSnapshot {
                node_id: node_id.index(),
                depth,
                visits: node.value().count(),
                value: node.value().mean(),
                particle_count: node.belief().len(),
                actions,
            });
        }

        Ok(TreeSnapshot {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            root_node_id: self.root.index(),
            node_count: self.node_count(),
            nodes,
        })
    }
}
