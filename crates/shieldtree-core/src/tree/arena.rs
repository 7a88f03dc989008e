use crate::tree::{error::ArenaError, ids::NodeId};

/// One storage slot. `value` is `None` while the slot sits on the free list.
#[derive(Debug, Clone)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Holds all items and allows for fast allocation and is cache friendly.
///
/// Freed slots go onto a free list and are recycled by later allocations.
/// Every release bumps the slot generation, so a handle that outlived its
/// element resolves to `None` instead of aliasing the slot's next occupant.
#[derive(Debug, Clone)]
pub(crate) struct Pool<T> {
    slots: Vec<Slot<T>>,
    free_list: Vec<u32>,
    live: usize,
    capacity: Option<usize>,
}

impl<T> Pool<T> {
    /// Create a new empty pool without a size limit
    pub fn new() -> Self {
        Pool {
            slots: Vec::new(),
            free_list: Vec::new(),
            live: 0,
            capacity: None,
        }
    }

    /// Create a pool that refuses to hold more than `capacity` live elements.
    pub fn with_capacity_limit(capacity: usize) -> Self {
        Pool {
            slots: Vec::with_capacity(capacity.min(4096)),
            free_list: Vec::new(),
            live: 0,
            capacity: Some(capacity),
        }
    }

    /// Store an item, reusing a recycled slot when one is available.
    pub fn allocate(&mut self, item: T) -> Result<NodeId, ArenaError> {
        if let Some(capacity) = self.capacity {
            if self.live >= capacity {
                return Err(ArenaError::CapacityExceeded { capacity });
            }
        }

        let id = match self.free_list.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.value = Some(item);
                NodeId::new(index, slot.generation)
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    value: Some(item),
                });
                NodeId::new(index, 0)
            }
        };

        self.live += 1;
        Ok(id)
    }

    /// Release one item and hand it back to the caller.
    pub fn free(&mut self, id: NodeId) -> Option<T> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.generation != id.generation() {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(id.index() as u32);
        self.live -= 1;
        Some(value)
    }

    /// Release every live item at once. Storage is kept for reuse.
    pub fn free_all(&mut self) {
        self.free_list.clear();
        for (index, slot) in self.slots.iter_mut().enumerate().rev() {
            if slot.value.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free_list.push(index as u32);
        }
        self.live = 0;
    }

    /// Retrieve an associated item from the pool
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.value.as_ref())
    }

    /// Retrieve an associated item from the pool as a mutable borrow
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.value.as_mut())
    }

    /// Number of live items
    pub fn len(&self) -> usize {
        self.live
    }

    /// Number of slots ever created, live or recycled.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}
