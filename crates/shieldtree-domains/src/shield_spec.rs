use serde::{Deserialize, Serialize};
use shieldtree_core::{DEFAULT_HELLINGER_THRESHOLD, HellingerShield};

use crate::{DomainsError, tiger::TigerShield};

pub const DEFAULT_OPEN_THRESHOLD: f64 = 0.92;
pub const DEFAULT_LISTEN_THRESHOLD: f64 = 0.87;

/// Serialized form of a tiger shield.
///
/// Reference points are `(p_left, p_right)` pairs. Open points are split by
/// side when the shield is built: a point leaning right is a safe place to
/// open the left door and the other way round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TigerShieldSpec {
    pub open_threshold: f64,
    pub listen_threshold: f64,
    pub complex: bool,
    pub hellinger_threshold: f64,
    pub listen_points: Vec<Vec<f64>>,
    pub open_points: Vec<Vec<f64>>,
}

impl Default for TigerShieldSpec {
    fn default() -> Self {
        TigerShieldSpec {
            open_threshold: DEFAULT_OPEN_THRESHOLD,
            listen_threshold: DEFAULT_LISTEN_THRESHOLD,
            complex: false,
            hellinger_threshold: DEFAULT_HELLINGER_THRESHOLD,
            listen_points: Vec::new(),
            open_points: Vec::new(),
        }
    }
}

impl TigerShieldSpec {
    /// Validate the spec and build the runtime shield.
    pub fn build(&self) -> Result<TigerShield, DomainsError> {
        check_threshold("open_threshold", self.open_threshold)?;
        check_threshold("listen_threshold", self.listen_threshold)?;
        check_threshold("hellinger_threshold", self.hellinger_threshold)?;
        check_points("listen_points", &self.listen_points)?;
        check_points("open_points", &self.open_points)?;

        let (open_left, open_right): (Vec<_>, Vec<_>) = self
            .open_points
            .iter()
            .cloned()
            .partition(|point| point[0] < point[1]);

        Ok(TigerShield {
            open_threshold: self.open_threshold,
            listen_threshold: self.listen_threshold,
            complex: self.complex,
            listen: HellingerShield::new(self.hellinger_threshold, self.listen_points.clone()),
            open_left: HellingerShield::new(self.hellinger_threshold, open_left),
            open_right: HellingerShield::new(self.hellinger_threshold, open_right),
        })
    }
}

fn check_threshold(name: &'static str, value: f64) -> Result<(), DomainsError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(DomainsError::InvalidThreshold { name, value })
    }
}

fn check_points(set: &'static str, points: &[Vec<f64>]) -> Result<(), DomainsError> {
    for (index, point) in points.iter().enumerate() {
        let valid = point.len() == 2 && point.iter().all(|p| (0.0..=1.0).contains(p));
        if !valid {
            return Err(DomainsError::InvalidReferencePoint {
                set,
                index,
                point: point.clone(),
            });
        }
    }
    Ok(())
}
