use serde::{Deserialize, Serialize};

use crate::tree::ids::ActionId;

/// Distance under which a belief counts as close to a reference point.
pub const DEFAULT_HELLINGER_THRESHOLD: f64 = 0.1;

/// Every action of a domain with `num_actions` actions, in index order.
pub fn all_actions(num_actions: usize) -> Vec<ActionId> {
    (0..num_actions).map(ActionId::from).collect()
}

/// Discrete Hellinger distance `sqrt(0.5 * sum((sqrt(p_i) - sqrt(q_i))^2))`.
///
/// Both slices are read as distributions over the same support; extra entries of the longer one are ignored.
pub fn hellinger(p: &[f64], q: &[f64]) -> f64 {
    let sum: f64 = p
        .iter()
        .zip(q)
        .map(|(p, q)| (p.sqrt() - q.sqrt()).powi(2))
        .sum();
    (0.5 * sum).sqrt()
}

/// Reference belief summaries that were previously judged safe for one action.
///
/// A belief is admitted when its distance to the closest reference point is at most the threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HellingerShield {
    threshold: f64,
    points: Vec<Vec<f64>>,
}

impl Default for HellingerShield {
    fn default() -> Self {
        HellingerShield {
            threshold: DEFAULT_HELLINGER_THRESHOLD,
            points: Vec::new(),
        }
    }
}

impl HellingerShield {
    pub fn new(threshold: f64, points: Vec<Vec<f64>>) -> Self {
        HellingerShield { threshold, points }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn set_threshold(&mut self, threshold: f64) {
        self.threshold = threshold;
    }

    pub fn points(&self) -> &[Vec<f64>] {
        &self.points
    }

    pub fn set_points(&mut self, points: Vec<Vec<f64>>) {
        self.points = points;
    }

    /// Distance from `q` to the nearest reference point, `None` without points.
    pub fn min_distance(&self, q: &[f64]) -> Option<f64> {
        self.points
            .iter()
            .map(|point| hellinger(point, q))
            .min_by(f64::total_cmp)
    }

    pub fn is_in_threshold(&self, q: &[f64]) -> bool {
        self.points
            .iter()
            .any(|point| hellinger(point, q) <= self.threshold)
    }
}
