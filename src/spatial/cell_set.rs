//! Indexed cell set with O(1) insert, remove and uniform sampling

use ahash::AHashMap;
use rand::Rng;

use crate::core::types::CellId;

/// Set of cell ids backed by a dense vector plus a position index
///
/// Removal swaps the last member into the freed slot, so member order is
/// not insertion order, but it is deterministic for a given sequence of
/// operations, which keeps seeded runs reproducible.
#[derive(Debug, Clone, Default)]
pub struct CellSet {
    members: Vec<CellId>,
    slots: AHashMap<CellId, usize>,
}

impl CellSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            members: Vec::with_capacity(capacity),
            slots: AHashMap::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[inline]
    pub fn contains(&self, cell: CellId) -> bool {
        self.slots.contains_key(&cell)
    }

    /// Returns false if the cell was already present
    pub fn insert(&mut self, cell: CellId) -> bool {
        if self.slots.contains_key(&cell) {
            return false;
        }
        self.slots.insert(cell, self.members.len());
        self.members.push(cell);
        true
    }

    /// Returns false if the cell was not present
    pub fn remove(&mut self, cell: CellId) -> bool {
        let Some(slot) = self.slots.remove(&cell) else {
            return false;
        };
        self.members.swap_remove(slot);
        if let Some(&moved) = self.members.get(slot) {
            self.slots.insert(moved, slot);
        }
        true
    }

    /// Uniformly random member, `None` when empty
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<CellId> {
        if self.members.is_empty() {
            return None;
        }
        let slot = rng.gen_range(0..self.members.len());
        Some(self.members[slot])
    }

    pub fn iter(&self) -> impl Iterator<Item = CellId> + '_ {
        self.members.iter().copied()
    }
}
