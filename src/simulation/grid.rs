//! Grid state and the happy / unhappy / empty partitions derived from it

use rand::Rng;

use crate::core::config::{cell_count, validate_rates, SimulationConfig};
use crate::core::error::{Result, SimError};
use crate::core::types::{CellId, Color, EdgePolicy};
use crate::simulation::cell::{assign_color, Cell};
use crate::simulation::happiness::{HappinessRule, Partition, PartitionChange};
use crate::spatial::cell_set::CellSet;
use crate::spatial::neighborhood;

/// Square grid of cells with O(1) partition membership
///
/// Every cell belongs to exactly one of `happy`, `unhappy` and `empty`;
/// `empty` holds exactly the cells whose state is `Color::Empty`.
#[derive(Debug, Clone)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
    happy: CellSet,
    unhappy: CellSet,
    empty: CellSet,
    rule: HappinessRule,
    edges: EdgePolicy,
}

impl Grid {
    /// Random grid drawn from the configured rates
    pub fn new<R: Rng + ?Sized>(config: &SimulationConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;
        let count = cell_count(config.size)?;
        let draws: Vec<f64> = (0..count).map(|_| rng.gen::<f64>()).collect();
        Self::from_draws(config, draws)
    }

    /// Grid built from explicit draws in `[0, 1)`, one per cell in index order
    pub fn from_draws(
        config: &SimulationConfig,
        draws: impl IntoIterator<Item = f64>,
    ) -> Result<Self> {
        config.validate()?;
        let count = cell_count(config.size)?;
        let layout: Vec<Color> = draws
            .into_iter()
            .take(count)
            .map(|draw| assign_color(draw, config.white_rate, config.black_rate))
            .collect();
        if layout.len() != count {
            return Err(SimError::config(format!(
                "expected {} draws, got {}",
                count,
                layout.len()
            )));
        }
        let rule = HappinessRule::new(config.happiness_cup, config.threshold);
        Self::with_layout(config.size, layout, rule, config.edges)
    }

    /// Grid with a fixed color per cell, happiness precomputed
    pub fn with_layout(
        size: usize,
        layout: Vec<Color>,
        rule: HappinessRule,
        edges: EdgePolicy,
    ) -> Result<Self> {
        if size == 0 {
            return Err(SimError::config("size must be positive"));
        }
        let count = cell_count(size)?;
        if layout.len() != count {
            return Err(SimError::config(format!(
                "layout has {} cells, a {}x{} grid needs {}",
                layout.len(),
                size,
                size,
                count
            )));
        }

        let mut grid = Self {
            size,
            cells: Vec::with_capacity(count),
            happy: CellSet::with_capacity(count),
            unhappy: CellSet::with_capacity(count),
            empty: CellSet::with_capacity(count),
            rule,
            edges,
        };

        for (index, state) in layout.into_iter().enumerate() {
            let cell = Cell::new(CellId(index), size, state);
            grid.set_for(Partition::of(cell.state, cell.is_happy))
                .insert(cell.id);
            grid.cells.push(cell);
        }

        grid.evaluate_all()?;
        Ok(grid)
    }

    /// Random grid of side `size` drawn from the given rates
    pub fn with_rates<R: Rng + ?Sized>(
        size: usize,
        white_rate: f64,
        black_rate: f64,
        rule: HappinessRule,
        edges: EdgePolicy,
        rng: &mut R,
    ) -> Result<Self> {
        validate_rates(white_rate, black_rate)?;
        let layout = (0..cell_count(size)?)
            .map(|_| assign_color(rng.gen::<f64>(), white_rate, black_rate))
            .collect();
        Self::with_layout(size, layout, rule, edges)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn rule(&self) -> &HappinessRule {
        &self.rule
    }

    #[inline]
    pub fn edges(&self) -> EdgePolicy {
        self.edges
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id.index()]
    }

    pub fn happy(&self) -> &CellSet {
        &self.happy
    }

    pub fn unhappy(&self) -> &CellSet {
        &self.unhappy
    }

    pub fn empty(&self) -> &CellSet {
        &self.empty
    }

    /// No occupied cell is unhappy
    pub fn is_converged(&self) -> bool {
        self.unhappy.is_empty()
    }

    /// Cell at `(x, y)`, `None` when off the grid under the edge policy
    pub fn get_cell_by_xy(&self, x: i64, y: i64) -> Option<&Cell> {
        neighborhood::resolve(x, y, self.size, self.edges).map(|id| self.cell(id))
    }

    /// State at `(x, y)`; off-grid coordinates read as Empty
    pub fn state_at(&self, x: i64, y: i64) -> Color {
        self.get_cell_by_xy(x, y)
            .map(|cell| cell.state)
            .unwrap_or(Color::Empty)
    }

    pub fn neighbors(&self, id: CellId) -> [Option<CellId>; 8] {
        neighborhood::moore_neighbors(id, self.size, self.edges)
    }

    /// Partition implied by the cached state of a cell
    pub fn partition(&self, id: CellId) -> Partition {
        let cell = self.cell(id);
        Partition::of(cell.state, cell.is_happy)
    }

    fn set_for(&mut self, partition: Partition) -> &mut CellSet {
        match partition {
            Partition::Happy => &mut self.happy,
            Partition::Unhappy => &mut self.unhappy,
            Partition::Empty => &mut self.empty,
        }
    }

    fn set_ref(&self, partition: Partition) -> &CellSet {
        match partition {
            Partition::Happy => &self.happy,
            Partition::Unhappy => &self.unhappy,
            Partition::Empty => &self.empty,
        }
    }

    /// Move a cell between sets; membership is checked before anything changes
    fn shift(&mut self, change: PartitionChange) -> Result<()> {
        if change.from == change.to {
            return Ok(());
        }
        if !self.set_ref(change.from).contains(change.cell) {
            return Err(SimError::invariant(
                change.cell,
                format!("expected in {:?} set", change.from),
            ));
        }
        if self.set_ref(change.to).contains(change.cell) {
            return Err(SimError::invariant(
                change.cell,
                format!("already in {:?} set", change.to),
            ));
        }

        self.set_for(change.from).remove(change.cell);
        self.set_for(change.to).insert(change.cell);
        self.cells[change.cell.index()].is_happy = change.to != Partition::Unhappy;
        Ok(())
    }

    /// Apply a transition produced by `HappinessRule::transition`
    pub fn apply(&mut self, change: PartitionChange) -> Result<()> {
        let state = self.cell(change.cell).state;
        if state.is_empty() != (change.to == Partition::Empty) {
            return Err(SimError::invariant(
                change.cell,
                format!("state {:?} cannot move to {:?} set", state, change.to),
            ));
        }
        self.shift(change)
    }

    /// Re-evaluate one cell, updating partitions if its verdict changed
    pub fn evaluate(&mut self, id: CellId) -> Result<Option<PartitionChange>> {
        let rule = self.rule;
        match rule.transition(self, id) {
            Some(change) => {
                self.apply(change)?;
                Ok(Some(change))
            }
            None => Ok(None),
        }
    }

    /// Re-evaluate every cell
    pub fn evaluate_all(&mut self) -> Result<Vec<PartitionChange>> {
        let mut changes = Vec::new();
        for index in 0..self.cells.len() {
            if let Some(change) = self.evaluate(CellId(index))? {
                changes.push(change);
            }
        }
        Ok(changes)
    }

    /// Replace the state of a cell and place it in the matching partition
    ///
    /// `is_happy` is taken as given for occupied states; Empty is always happy.
    pub(crate) fn recolor(
        &mut self,
        id: CellId,
        state: Color,
        is_happy: bool,
    ) -> Result<Option<PartitionChange>> {
        let change = PartitionChange {
            cell: id,
            from: self.partition(id),
            to: Partition::of(state, is_happy),
        };
        self.shift(change)?;
        let cell = &mut self.cells[id.index()];
        cell.state = state;
        cell.is_happy = state.is_empty() || is_happy;
        Ok((change.from != change.to).then_some(change))
    }

    /// Flip a cached verdict without touching the sets
    #[cfg(test)]
    pub(crate) fn flip_cached_flag(&mut self, id: CellId) {
        let cell = &mut self.cells[id.index()];
        cell.is_happy = !cell.is_happy;
    }

    /// Full consistency check of cached flags against the three sets
    pub fn check_invariants(&self) -> Result<()> {
        for cell in &self.cells {
            let memberships = [
                (Partition::Happy, self.happy.contains(cell.id)),
                (Partition::Unhappy, self.unhappy.contains(cell.id)),
                (Partition::Empty, self.empty.contains(cell.id)),
            ];
            let found: Vec<Partition> = memberships
                .iter()
                .filter(|(_, present)| *present)
                .map(|(partition, _)| *partition)
                .collect();

            if found.len() != 1 {
                return Err(SimError::invariant(
                    cell.id,
                    format!("member of {:?}", found),
                ));
            }
            let expected = Partition::of(cell.state, cell.is_happy);
            if found[0] != expected {
                return Err(SimError::invariant(
                    cell.id,
                    format!("in {:?} set but cached as {:?}", found[0], expected),
                ));
            }
            if cell.is_empty() && !cell.is_happy {
                return Err(SimError::invariant(cell.id, "empty cell cached unhappy"));
            }
        }

        let total = self.happy.len() + self.unhappy.len() + self.empty.len();
        if total != self.cells.len() {
            return Err(SimError::invariant(
                CellId(0),
                format!("partitions hold {} of {} cells", total, self.cells.len()),
            ));
        }
        Ok(())
    }
}
