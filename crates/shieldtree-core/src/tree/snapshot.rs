use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct TreeSnapshot {
    pub schema_version: u32,
    pub root_node_id: usize,
    pub node_count: usize,
    pub nodes: Vec<NodeSnapshot>,
}

impl TreeSnapshot {
    /// Render the snapshot as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeSnapshot {
    pub node_id: usize,
    pub depth: usize,
    pub visits: u64,
    pub value: f64,
    pub particle_count: usize,
    pub actions: Vec<ActionSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionSnapshot {
    pub action_id: usize,
    pub visits: u64,
    pub value_sum: f64,
    pub q: f64,
    pub rave_count: f64,
    pub rave_q: f64,
    pub children: Vec<ObservationEdgeSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ObservationEdgeSnapshot {
    pub observation: u64,
    pub child_node_id: usize,
}
