//! Happiness rule and the partition transitions it produces

use serde::{Deserialize, Serialize};

use crate::core::types::{CellId, Color, ThresholdPolicy};
use crate::simulation::grid::Grid;

/// Which of the three derived sets a cell belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Partition {
    Happy,
    Unhappy,
    Empty,
}

impl Partition {
    /// Partition implied by a state and a happiness verdict
    pub fn of(state: Color, is_happy: bool) -> Self {
        match (state, is_happy) {
            (Color::Empty, _) => Partition::Empty,
            (_, true) => Partition::Happy,
            (_, false) => Partition::Unhappy,
        }
    }
}

/// A cell leaving one partition for another
///
/// Produced by evaluation and recoloring, applied by `Grid::apply`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionChange {
    pub cell: CellId,
    pub from: Partition,
    pub to: Partition,
}

/// Neighbor-count happiness rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HappinessRule {
    pub happiness_cup: u32,
    pub threshold: ThresholdPolicy,
}

impl HappinessRule {
    pub fn new(happiness_cup: u32, threshold: ThresholdPolicy) -> Self {
        Self {
            happiness_cup,
            threshold,
        }
    }

    /// Verdict for a given state and same-type neighbor count
    #[inline]
    pub fn verdict(&self, state: Color, same_type: u32) -> bool {
        state.is_empty() || self.threshold.satisfied(same_type, self.happiness_cup)
    }

    /// Neighbors of `cell` whose state equals `state`
    ///
    /// Off-grid slots are Empty and never match an occupied state.
    pub fn same_type_count(&self, grid: &Grid, cell: CellId, state: Color) -> u32 {
        grid.neighbors(cell)
            .into_iter()
            .flatten()
            .filter(|&neighbor| grid.cell(neighbor).state == state)
            .count() as u32
    }

    /// Would `cell` be happy if it held `state`, given its current neighbors
    pub fn is_happy_as(&self, grid: &Grid, cell: CellId, state: Color) -> bool {
        if state.is_empty() {
            return true;
        }
        self.verdict(state, self.same_type_count(grid, cell, state))
    }

    /// Is the cell happy in its current state
    pub fn is_happy(&self, grid: &Grid, cell: CellId) -> bool {
        self.is_happy_as(grid, cell, grid.cell(cell).state)
    }

    /// Transition needed to bring the cached verdict up to date, if any
    ///
    /// Pure: the grid is not touched. Empty cells never transition here.
    pub fn transition(&self, grid: &Grid, cell: CellId) -> Option<PartitionChange> {
        let current = grid.cell(cell);
        if current.is_empty() {
            return None;
        }
        let verdict = self.is_happy(grid, cell);
        if verdict == current.is_happy {
            return None;
        }
        Some(PartitionChange {
            cell,
            from: Partition::of(current.state, current.is_happy),
            to: Partition::of(current.state, verdict),
        })
    }
}
