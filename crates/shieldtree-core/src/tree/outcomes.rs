use indexmap::IndexMap;

use crate::tree::ids::{NodeId, ObservationId};

/// Why a table refused to register a child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertRejected {
    /// The observation already has a child.
    Occupied,
    /// The observation lies outside a bounded table.
    OutOfRange { num_observations: u64 },
}

/// Children of one action node, keyed by the observation that led to them.
///
/// Entries are created lazily; an observation never seen under the action has no entry.
pub trait ObservationTable: std::fmt::Debug {
    /// Create an empty table for a domain with `num_observations` observations.
    fn new(num_observations: u64) -> Self;

    /// Find the child node reached through `observation`
    fn child(&self, observation: ObservationId) -> Option<NodeId>;

    /// Register a new child. Fails if the slot is taken or outside the table.
    fn insert(&mut self, observation: ObservationId, child: NodeId) -> Result<(), InsertRejected>;

    /// Return the amount of children registered
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered `(observation, child)` pairs.
    fn entries(&self) -> Vec<(ObservationId, NodeId)>;
}

/// Array-backed table for bounded observation spaces.
/// The backing array is sized on first insert so unexplored actions cost nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenseObservations {
    num_observations: u64,
    slots: Vec<Option<NodeId>>,
    occupied: usize,
}

impl ObservationTable for DenseObservations {
    fn new(num_observations: u64) -> Self {
        DenseObservations {
            num_observations,
            slots: Vec::new(),
            occupied: 0,
        }
    }

    fn child(&self, observation: ObservationId) -> Option<NodeId> {
        let index = usize::try_from(observation.value()).ok()?;
        self.slots.get(index).copied().flatten()
    }

    fn insert(&mut self, observation: ObservationId, child: NodeId) -> Result<(), InsertRejected> {
        if observation.value() >= self.num_observations {
            return Err(InsertRejected::OutOfRange {
                num_observations: self.num_observations,
            });
        }
        if self.slots.is_empty() {
            self.slots = vec![None; self.num_observations as usize];
        }

        let slot = &mut self.slots[observation.value() as usize];
        if slot.is_some() {
            return Err(InsertRejected::Occupied);
        }
        *slot = Some(child);
        self.occupied += 1;
        Ok(())
    }

    fn len(&self) -> usize {
        self.occupied
    }

    fn entries(&self) -> Vec<(ObservationId, NodeId)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.map(|id| (ObservationId::from(index as u64), id)))
            .collect()
    }
}

/// Map-backed table for huge or sparse observation spaces.
/// Iteration follows first-visit order, which keeps snapshots deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SparseObservations {
    children: IndexMap<ObservationId, NodeId>,
}

impl ObservationTable for SparseObservations {
    fn new(_num_observations: u64) -> Self {
        SparseObservations::default()
    }

    fn child(&self, observation: ObservationId) -> Option<NodeId> {
        self.children.get(&observation).copied()
    }

    fn insert(&mut self, observation: ObservationId, child: NodeId) -> Result<(), InsertRejected> {
        if self.children.contains_key(&observation) {
            return Err(InsertRejected::Occupied);
        }
        self.children.insert(observation, child);
        Ok(())
    }

    fn len(&self) -> usize {
        self.children.len()
    }

    fn entries(&self) -> Vec<(ObservationId, NodeId)> {
        self.children.iter().map(|(obs, id)| (*obs, *id)).collect()
    }
}
