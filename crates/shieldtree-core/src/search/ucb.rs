/// Node visit counts covered by the precomputed table.
pub const DEFAULT_NODE_VISITS: usize = 10_000;
/// Action visit counts covered by the precomputed table.
pub const DEFAULT_ACTION_VISITS: usize = 100;

/// Precomputed UCB1 exploration bonuses for one exploration constant.
///
/// Build one per configuration; planners that share a constant can share the
/// table behind an `Arc`. Counts outside the table use the closed form.
#[derive(Debug, Clone)]
pub struct UcbTable {
    exploration: f64,
    node_visits: usize,
    action_visits: usize,
    bonuses: Vec<f64>,
}

impl UcbTable {
    pub fn new(exploration: f64) -> Self {
        Self::with_dimensions(exploration, DEFAULT_NODE_VISITS, DEFAULT_ACTION_VISITS)
    }

    pub fn with_dimensions(exploration: f64, node_visits: usize, action_visits: usize) -> Self {
        let mut bonuses = Vec::with_capacity(node_visits * action_visits);
        for big_n in 0..node_visits {
            for n in 0..action_visits {
                bonuses.push(closed_form(exploration, big_n as u64, n as u64));
            }
        }

        UcbTable {
            exploration,
            node_visits,
            action_visits,
            bonuses,
        }
    }

    pub fn exploration(&self) -> f64 {
        self.exploration
    }

    /// `c * sqrt(ln(N + 1) / n)`, or `+inf` for an untried action.
    pub fn bonus(&self, node_visits: u64, action_visits: u64) -> f64 {
        let (big_n, n) = (node_visits as usize, action_visits as usize);
        if big_n < self.node_visits && n < self.action_visits {
            self.bonuses[big_n * self.action_visits + n]
        } else {
            closed_form(self.exploration, node_visits, action_visits)
        }
    }
}

fn closed_form(exploration: f64, node_visits: u64, action_visits: u64) -> f64 {
    if action_visits == 0 {
        f64::INFINITY
    } else {
        exploration * ((node_visits as f64 + 1.0).ln() / action_visits as f64).sqrt()
    }
}
