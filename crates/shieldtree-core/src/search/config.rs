use std::{fmt, fs, path::Path};

use serde::{Deserialize, Serialize};

const DEFAULT_SEARCH_CONFIG_YAML: &str = include_str!("../../config/search.default.yaml");

/// How much domain knowledge a policy may use.
/// Levels are ordered: every level includes the knowledge of the ones below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnowledgeLevel {
    /// Uniform over every action.
    Pure,
    /// Restricted to the domain's legal actions.
    Legal,
    /// Legal actions plus the domain's preferred ones.
    Smart,
}

/// Knowledge levels for the tree prior and the rollout policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Knowledge {
    pub rollout_level: KnowledgeLevel,
    pub tree_level: KnowledgeLevel,
    /// Prior visit count given to preferred actions at `Smart`.
    pub smart_tree_count: u64,
    /// Prior value given to preferred actions at `Smart`.
    pub smart_tree_value: f64,
}

impl Default for Knowledge {
    fn default() -> Self {
        Knowledge {
            rollout_level: KnowledgeLevel::Legal,
            tree_level: KnowledgeLevel::Legal,
            smart_tree_count: 10,
            smart_tree_value: 1.0,
        }
    }
}

/// Search configuration for the belief tree planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub num_simulations: usize,
    pub num_start_states: usize,
    pub max_depth: usize,
    /// Visits an action needs before a child is grown under it.
    pub expand_count: u64,
    pub exploration_constant: f64,
    /// Derive the exploration constant from the domain instead of `exploration_constant`.
    pub auto_exploration: bool,
    pub use_rave: bool,
    pub rave_discount: f64,
    pub rave_constant: f64,
    pub use_transforms: bool,
    pub num_transforms: usize,
    pub max_attempts: usize,
    /// Replace tree search with a flat rollout comparison at the root.
    pub disable_tree: bool,
    pub use_shield: bool,
    pub seed: u64,
    /// Upper bound on live tree nodes. `None` leaves the pool unbounded.
    pub node_capacity: Option<usize>,
    pub knowledge: Knowledge,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            num_simulations: 1000,
            num_start_states: 1000,
            max_depth: 100,
            expand_count: 1,
            exploration_constant: 1.0,
            auto_exploration: false,
            use_rave: false,
            rave_discount: 1.0,
            rave_constant: 0.01,
            use_transforms: true,
            num_transforms: 0,
            max_attempts: 0,
            disable_tree: false,
            use_shield: false,
            seed: 0,
            node_capacity: None,
            knowledge: Knowledge::default(),
        }
    }
}

impl SearchConfig {
    /// Parse a search config from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: SearchConfig = serde_yaml::from_str(yaml).map_err(ConfigError::Yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a search config from a YAML file path.
    pub fn from_yaml_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let yaml = fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_yaml_str(&yaml)
    }

    /// Return the default YAML config included with this crate.
    pub fn default_yaml() -> &'static str {
        DEFAULT_SEARCH_CONFIG_YAML
    }

    /// Parse the default YAML config included with this crate.
    pub fn from_default_yaml() -> Result<Self, ConfigError> {
        Self::from_yaml_str(Self::default_yaml())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_simulations == 0 {
            return Err(ConfigError::Invalid(
                "num_simulations must be greater than 0".to_string(),
            ));
        }
        if self.num_start_states == 0 {
            return Err(ConfigError::Invalid(
                "num_start_states must be greater than 0".to_string(),
            ));
        }
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid(
                "max_depth must be greater than 0".to_string(),
            ));
        }
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(ConfigError::Invalid(
                "exploration_constant must be finite and >= 0".to_string(),
            ));
        }
        if !(self.rave_discount > 0.0 && self.rave_discount <= 1.0) {
            return Err(ConfigError::Invalid(
                "rave_discount must lie in (0, 1]".to_string(),
            ));
        }
        if !self.rave_constant.is_finite() || self.rave_constant < 0.0 {
            return Err(ConfigError::Invalid(
                "rave_constant must be finite and >= 0".to_string(),
            ));
        }
        if self.node_capacity == Some(0) {
            return Err(ConfigError::Invalid(
                "node_capacity must be greater than 0 when set".to_string(),
            ));
        }
        Ok(())
    }
}

/// Error type for loading and validating `SearchConfig`.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "failed to read config file: {err}"),
            ConfigError::Yaml(err) => write!(f, "failed to parse config YAML: {err}"),
            ConfigError::Invalid(err) => write!(f, "invalid search config: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Yaml(err) => Some(err),
            ConfigError::Invalid(_) => None,
        }
    }
}
