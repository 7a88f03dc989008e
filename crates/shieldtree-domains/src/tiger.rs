use rand::Rng;
use shieldtree_core::{
    ActionId, BeliefState, BeliefStats, Domain, HellingerShield, ObservationId, StepOutcome,
};

use crate::shield_spec::{DEFAULT_LISTEN_THRESHOLD, DEFAULT_OPEN_THRESHOLD};

const LISTEN_ACCURACY: f64 = 0.85;
const LISTEN_COST: f64 = -1.0;
const TREASURE_REWARD: f64 = 10.0;
const TIGER_PENALTY: f64 = -100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TigerAction {
    Listen = 0,
    OpenLeft = 1,
    OpenRight = 2,
}

impl TigerAction {
    pub const COUNT: usize = 3;

    pub fn from_id(action: ActionId) -> Option<Self> {
        match action.index() {
            0 => Some(TigerAction::Listen),
            1 => Some(TigerAction::OpenLeft),
            2 => Some(TigerAction::OpenRight),
            _ => None,
        }
    }
}

impl From<TigerAction> for ActionId {
    fn from(action: TigerAction) -> Self {
        ActionId::from(action as usize)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TigerObservation {
    LeftRoar = 0,
    RightRoar = 1,
    Treasure = 2,
    Tiger = 3,
}

impl TigerObservation {
    pub const COUNT: u64 = 4;

    pub fn from_id(observation: ObservationId) -> Option<Self> {
        match observation.value() {
            0 => Some(TigerObservation::LeftRoar),
            1 => Some(TigerObservation::RightRoar),
            2 => Some(TigerObservation::Treasure),
            3 => Some(TigerObservation::Tiger),
            _ => None,
        }
    }
}

impl From<TigerObservation> for ObservationId {
    fn from(observation: TigerObservation) -> Self {
        ObservationId::from(observation as u64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TigerState {
    pub tiger_on_left: bool,
}

/// How many particles put the tiger behind the left door.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TigerStats {
    on_left: usize,
    total: usize,
}

impl TigerStats {
    pub fn on_left(&self) -> usize {
        self.on_left
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Fraction of particles with the tiger on the left; 0 for an empty belief.
    pub fn perc_on_left(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.on_left as f64 / self.total as f64
        }
    }
}

impl BeliefStats<TigerState> for TigerStats {
    fn update(&mut self, particle: &TigerState) {
        self.total += 1;
        if particle.tiger_on_left {
            self.on_left += 1;
        }
    }

    fn clear(&mut self) {
        *self = TigerStats::default();
    }
}

/// Runtime shield for the tiger problem.
///
/// Built from a [`crate::TigerShieldSpec`]; the default is the threshold rule
/// alone with no reference points.
#[derive(Debug, Clone, PartialEq)]
pub struct TigerShield {
    pub(crate) open_threshold: f64,
    pub(crate) listen_threshold: f64,
    pub(crate) complex: bool,
    pub(crate) listen: HellingerShield,
    pub(crate) open_left: HellingerShield,
    pub(crate) open_right: HellingerShield,
}

impl Default for TigerShield {
    fn default() -> Self {
        TigerShield {
            open_threshold: DEFAULT_OPEN_THRESHOLD,
            listen_threshold: DEFAULT_LISTEN_THRESHOLD,
            complex: false,
            listen: HellingerShield::default(),
            open_left: HellingerShield::default(),
            open_right: HellingerShield::default(),
        }
    }
}

impl TigerShield {
    pub fn open_threshold(&self) -> f64 {
        self.open_threshold
    }

    pub fn listen_threshold(&self) -> f64 {
        self.listen_threshold
    }

    pub fn is_complex(&self) -> bool {
        self.complex
    }

    pub fn listen_points(&self) -> &HellingerShield {
        &self.listen
    }

    pub fn open_left_points(&self) -> &HellingerShield {
        &self.open_left
    }

    pub fn open_right_points(&self) -> &HellingerShield {
        &self.open_right
    }

    /// Actions admitted for a belief with `p_left` of its mass on the left door.
    /// Never empty: listening is admitted when nothing else qualifies.
    pub fn admit(&self, p_left: f64) -> Vec<ActionId> {
        let point = [p_left, 1.0 - p_left];
        let mut admitted = Vec::with_capacity(TigerAction::COUNT);

        let listen = (1.0 - self.listen_threshold..=self.listen_threshold).contains(&p_left)
            || (self.complex && self.listen.is_in_threshold(&point));
        if listen {
            admitted.push(TigerAction::Listen.into());
        }

        let open_left = p_left <= 1.0 - self.open_threshold
            || (self.complex && self.open_left.is_in_threshold(&point));
        if open_left {
            admitted.push(TigerAction::OpenLeft.into());
        }

        let open_right = p_left >= self.open_threshold
            || (self.complex && self.open_right.is_in_threshold(&point));
        if open_right {
            admitted.push(TigerAction::OpenRight.into());
        }

        if admitted.is_empty() {
            admitted.push(TigerAction::Listen.into());
        }
        admitted
    }
}

/// Classic tiger problem: listen for roars, then open one of two doors.
#[derive(Debug, Clone, Default)]
pub struct Tiger {
    shield: TigerShield,
}

impl Tiger {
    pub fn new() -> Self {
        Tiger::default()
    }

    pub fn with_shield(shield: TigerShield) -> Self {
        Tiger { shield }
    }

    pub fn shield(&self) -> &TigerShield {
        &self.shield
    }
}

impl Domain for Tiger {
    type State = TigerState;
    type Stats = TigerStats;

    fn num_actions(&self) -> usize {
        TigerAction::COUNT
    }

    fn num_observations(&self) -> u64 {
        TigerObservation::COUNT
    }

    fn reward_range(&self) -> f64 {
        TREASURE_REWARD - TIGER_PENALTY
    }

    fn create_start_state<R: Rng + ?Sized>(&self, rng: &mut R) -> TigerState {
        TigerState {
            tiger_on_left: rng.gen_bool(0.5),
        }
    }

    /// Unknown actions end the episode with no reward.
    fn step<R: Rng + ?Sized>(
        &self,
        state: &mut TigerState,
        action: ActionId,
        rng: &mut R,
    ) -> StepOutcome {
        let Some(action) = TigerAction::from_id(action) else {
            return StepOutcome::new(TigerObservation::Tiger, 0.0, true);
        };

        match action {
            TigerAction::Listen => {
                let heard_left = state.tiger_on_left == rng.gen_bool(LISTEN_ACCURACY);
                let observation = if heard_left {
                    TigerObservation::LeftRoar
                } else {
                    TigerObservation::RightRoar
                };
                StepOutcome::new(observation, LISTEN_COST, false)
            }
            TigerAction::OpenLeft | TigerAction::OpenRight => {
                let found_tiger = state.tiger_on_left == (action == TigerAction::OpenLeft);
                if found_tiger {
                    StepOutcome::new(TigerObservation::Tiger, TIGER_PENALTY, true)
                } else {
                    StepOutcome::new(TigerObservation::Treasure, TREASURE_REWARD, true)
                }
            }
        }
    }

    fn belief_stats(&self) -> TigerStats {
        TigerStats::default()
    }

    fn pre_shield(&self, belief: &BeliefState<TigerState, TigerStats>) -> Vec<ActionId> {
        self.shield.admit(belief.stats().perc_on_left())
    }
}
