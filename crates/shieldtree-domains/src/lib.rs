mod counting;
mod episode;
mod error;
mod io;
mod shield_spec;
mod tiger;

pub use counting::{CountingSimulator, CountingState};
pub use episode::{EpisodeConfig, EpisodeResult, EpisodeStep, run_episode};
pub use error::DomainsError;
pub use io::{build_shield_yaml, load_shield_yaml, save_shield_yaml, shield_from_yaml_str};
pub use shield_spec::{DEFAULT_LISTEN_THRESHOLD, DEFAULT_OPEN_THRESHOLD, TigerShieldSpec};
pub use tiger::{Tiger, TigerAction, TigerObservation, TigerShield, TigerState, TigerStats};
