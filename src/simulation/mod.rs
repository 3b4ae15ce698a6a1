//! Grid state and the happiness-driven relocation engine

pub mod cell;
pub mod grid;
pub mod happiness;
pub mod output;
pub mod relocation;
pub mod tick;

pub use cell::{assign_color, Cell};
pub use grid::Grid;
pub use happiness::{HappinessRule, Partition, PartitionChange};
pub use output::{CellView, GridStats, RunSummary, Snapshot};
pub use relocation::{relocate, step, Move, StepOutcome};
pub use tick::{LoopState, SimulationLoop, Snapshots};
