use thiserror::Error;

use crate::{
    search::{config::ConfigError, domain::DomainError},
    tree::{
        error::TreeError,
        ids::{ActionId, NodeId},
    },
};

/// Failures raised while planning.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// The candidate set at a node was empty. The domain broke its contract.
    #[error("no candidate action at node {node_id}")]
    NoLegalActions { node_id: NodeId },

    #[error("cannot sample a particle from an empty belief")]
    EmptyBelief,

    #[error("action {action} outside the {num_actions} actions of the domain")]
    InvalidAction { action: ActionId, num_actions: usize },
}
