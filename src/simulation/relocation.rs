//! One relocation step: an unhappy agent moves to a random empty cell

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};
use crate::core::types::{CellId, Color, RelocationPolicy};
use crate::simulation::grid::Grid;
use crate::simulation::happiness::PartitionChange;

/// A completed move and every partition transition it caused
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub from: CellId,
    pub to: CellId,
    pub color: Color,
    pub changes: Vec<PartitionChange>,
}

impl Move {
    /// Cells whose partition changed, in the order the changes were applied
    pub fn changed_cells(&self) -> impl Iterator<Item = CellId> + '_ {
        self.changes.iter().map(|change| change.cell)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Moved(Move),
    /// No unhappy cell exists; the grid was not touched
    Settled,
}

impl StepOutcome {
    pub fn moved(&self) -> bool {
        matches!(self, StepOutcome::Moved(_))
    }
}

/// Pick an unhappy cell and an empty cell uniformly at random and relocate
///
/// Returns `SimError::NoEmptyCellAvailable` when unhappy cells exist but no
/// empty cell does; the grid is left unchanged in that case.
pub fn step<R: Rng + ?Sized>(
    grid: &mut Grid,
    policy: RelocationPolicy,
    rng: &mut R,
) -> Result<StepOutcome> {
    let Some(from) = grid.unhappy().sample(rng) else {
        return Ok(StepOutcome::Settled);
    };
    let Some(to) = grid.empty().sample(rng) else {
        return Err(SimError::NoEmptyCellAvailable);
    };

    let moved = relocate(grid, from, to, policy)?;
    tracing::debug!(
        "Moved {} from {} to {} ({} partition changes)",
        moved.color,
        moved.from,
        moved.to,
        moved.changes.len()
    );
    Ok(StepOutcome::Moved(moved))
}

/// Move the occupant of `from` into the empty cell `to`
pub fn relocate(
    grid: &mut Grid,
    from: CellId,
    to: CellId,
    policy: RelocationPolicy,
) -> Result<Move> {
    let color = grid.cell(from).state;
    if color.is_empty() {
        return Err(SimError::invariant(from, "relocation source is empty"));
    }
    if !grid.cell(to).is_empty() {
        return Err(SimError::invariant(to, "relocation target is occupied"));
    }

    let mut changes = Vec::new();
    changes.extend(grid.recolor(from, Color::Empty, true)?);

    match policy {
        RelocationPolicy::Swap => {
            let verdict = grid.rule().is_happy_as(grid, to, color);
            changes.extend(grid.recolor(to, color, verdict)?);
            for neighbor in affected_neighbors(grid, from, to, &[to]) {
                changes.extend(grid.evaluate(neighbor)?);
            }
        }
        RelocationPolicy::ColorTransfer => {
            changes.extend(grid.recolor(to, color, true)?);
            for neighbor in affected_neighbors(grid, from, to, &[from, to]) {
                changes.extend(grid.evaluate(neighbor)?);
            }
        }
    }

    Ok(Move {
        from,
        to,
        color,
        changes,
    })
}

/// Neighbors of both cells, each listed once, minus `skip`
fn affected_neighbors(grid: &Grid, a: CellId, b: CellId, skip: &[CellId]) -> Vec<CellId> {
    let mut cells: Vec<CellId> = Vec::with_capacity(16);
    for id in grid.neighbors(a).into_iter().chain(grid.neighbors(b)).flatten() {
        if !skip.contains(&id) && !cells.contains(&id) {
            cells.push(id);
        }
    }
    cells
}
