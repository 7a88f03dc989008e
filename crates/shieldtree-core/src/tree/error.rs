use std::fmt;

use crate::tree::ids::{ActionId, NodeId, ObservationId};

/// Errors raised by the node pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArenaError {
    /// The pool already holds its configured maximum of live elements.
    CapacityExceeded { capacity: usize },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArenaError::CapacityExceeded { capacity } => {
                write!(f, "arena capacity exceeded: {capacity} live elements")
            }
        }
    }
}

impl std::error::Error for ArenaError {}

/// Error type for belief tree construction and traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The handle does not resolve to a live node (never allocated, freed, or recycled).
    MissingNode { node_id: NodeId },
    /// Attempted to access an action node that does not exist for an observation node.
    MissingAction {
        node_id: NodeId,
        action_id: ActionId,
    },
    /// A dense observation table received an observation outside `[0, num_observations)`.
    ObservationOutOfRange {
        observation: ObservationId,
        num_observations: u64,
    },
    /// Attempted to attach a child where one already exists.
    ChildAlreadyPresent {
        node_id: NodeId,
        action_id: ActionId,
        observation: ObservationId,
    },
    /// The node pool refused an allocation.
    Arena(ArenaError),
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::MissingNode { node_id } => {
                write!(f, "missing node with id {node_id}")
            }
            TreeError::MissingAction { node_id, action_id } => {
                write!(f, "missing action {action_id} on node {node_id}")
            }
            TreeError::ObservationOutOfRange {
                observation,
                num_observations,
            } => write!(
                f,
                "observation {observation} outside dense table of {num_observations} observations"
            ),
            TreeError::ChildAlreadyPresent {
                node_id,
                action_id,
                observation,
            } => write!(
                f,
                "child for observation {observation} under action {action_id} on node {node_id} already exists"
            ),
            TreeError::Arena(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for TreeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TreeError::Arena(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ArenaError> for TreeError {
    fn from(err: ArenaError) -> Self {
        TreeError::Arena(err)
    }
}
