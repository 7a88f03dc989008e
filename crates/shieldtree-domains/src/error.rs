use shieldtree_core::SearchError;
use thiserror::Error;

#[derive(Debug, Error)]
/// Error type for loading domain configuration and running episodes.
pub enum DomainsError {
    #[error("failed to read YAML file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("threshold '{name}' must lie in [0, 1], got {value}")]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error("reference point {index} of '{set}' is not a two-entry distribution: {point:?}")]
    InvalidReferencePoint {
        set: &'static str,
        index: usize,
        point: Vec<f64>,
    },

    #[error("planner failed: {0}")]
    Search(#[from] SearchError),
}
