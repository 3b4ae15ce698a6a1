//! Read-only views of the grid handed to renderers and loggers

use std::fmt::Write as _;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::types::{Color, Tick};
use crate::simulation::grid::Grid;
use crate::simulation::tick::LoopState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    pub x: usize,
    pub y: usize,
    pub state: Color,
    pub is_happy: bool,
}

/// Partition and population counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridStats {
    pub happy: usize,
    pub unhappy: usize,
    pub empty: usize,
    pub type_a: usize,
    pub type_b: usize,
}

impl GridStats {
    pub fn of(grid: &Grid) -> Self {
        let type_a = grid
            .cells()
            .iter()
            .filter(|cell| cell.state == Color::TypeA)
            .count();
        Self {
            happy: grid.happy().len(),
            unhappy: grid.unhappy().len(),
            empty: grid.empty().len(),
            type_a,
            type_b: grid.cells().len() - grid.empty().len() - type_a,
        }
    }

    pub fn occupied(&self) -> usize {
        self.type_a + self.type_b
    }

    /// Share of occupied cells that are happy; 1.0 for an unoccupied grid
    pub fn happy_ratio(&self) -> f64 {
        if self.occupied() == 0 {
            1.0
        } else {
            self.happy as f64 / self.occupied() as f64
        }
    }
}

/// Point-in-time copy of the grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: Tick,
    pub state: LoopState,
    pub size: usize,
    pub cells: Vec<CellView>,
    pub stats: GridStats,
}

impl Snapshot {
    pub fn capture(grid: &Grid, tick: Tick, state: LoopState) -> Self {
        let cells = grid
            .cells()
            .iter()
            .map(|cell| CellView {
                x: cell.x,
                y: cell.y,
                state: cell.state,
                is_happy: cell.is_happy,
            })
            .collect();

        Self {
            tick,
            state,
            size: grid.size(),
            cells,
            stats: GridStats::of(grid),
        }
    }

    /// `x:y = color (is_happy)` for every cell, in index order
    pub fn cells_to_text(&self) -> String {
        let mut text = String::with_capacity(self.cells.len() * 20);
        for cell in &self.cells {
            let _ = write!(
                text,
                "{}:{} = {} ({})",
                cell.x, cell.y, cell.state, cell.is_happy
            );
        }
        text
    }

    /// Diagnostic log entry for this snapshot
    pub fn to_log_entry(&self) -> String {
        format!("Cells on iteration {}:\n{}\n", self.tick, self.cells_to_text())
    }
}

/// Outcome of a complete run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub final_state: LoopState,
    pub ticks: Tick,
    pub moves: u64,
    pub stalled_ticks: u64,
    pub snapshots: u64,
    pub initial: GridStats,
    pub last: GridStats,
    pub simulation_time_ms: u64,
}

impl RunSummary {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        final_state: LoopState,
        ticks: Tick,
        moves: u64,
        stalled_ticks: u64,
        snapshots: u64,
        initial: GridStats,
        last: GridStats,
        elapsed: Duration,
    ) -> Self {
        Self {
            final_state,
            ticks,
            moves,
            stalled_ticks,
            snapshots,
            initial,
            last,
            simulation_time_ms: elapsed.as_millis() as u64,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn summary(&self) -> String {
        format!(
            "{:?} after {} ticks in {}ms\n{} moves, {} unhappy -> {} unhappy, {:.1}% happy",
            self.final_state,
            self.ticks,
            self.simulation_time_ms,
            self.moves,
            self.initial.unhappy,
            self.last.unhappy,
            self.last.happy_ratio() * 100.0,
        )
    }
}
