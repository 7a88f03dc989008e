mod search;
mod tree;

pub use search::config::{ConfigError, Knowledge, KnowledgeLevel, SearchConfig};
pub use search::domain::{Domain, DomainError, StepOutcome};
pub use search::error::SearchError;
pub use search::knowledge::{LARGE_INTEGER, apply_prior, select_random};
pub use search::planner::{BeliefUpdate, Planner, SearchStats};
pub use search::rollout::{RolloutParams, RolloutResult, rollout};
pub use search::shield::{DEFAULT_HELLINGER_THRESHOLD, HellingerShield, all_actions, hellinger};
pub use search::ucb::UcbTable;
pub use tree::belief::{BeliefState, BeliefStats};
pub use tree::edges::ActionNode;
pub use tree::error::{ArenaError, TreeError};
pub use tree::history::{History, HistoryEntry, TrialScope};
pub use tree::ids::{ActionId, NodeId, ObservationId};
pub use tree::node::ObservationNode;
pub use tree::outcomes::{DenseObservations, InsertRejected, ObservationTable, SparseObservations};
pub use tree::search_tree::BeliefTree;
pub use tree::snapshot::{ActionSnapshot, NodeSnapshot, ObservationEdgeSnapshot, TreeSnapshot};
pub use tree::stats::{Count, RunningStat, ValueEstimator};
