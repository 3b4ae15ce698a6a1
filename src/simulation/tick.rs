//! Simulation loop - drives relocation steps until convergence or budget
//!
//! The loop owns the grid and the RNG. Consumers either call `tick` / `run`
//! directly or turn the loop into a `Snapshots` iterator, which yields a
//! sampled copy of the grid every `snapshot_interval` ticks plus the
//! initial and final states.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::{RelocationPolicy, StallPolicy, Tick};
use crate::simulation::grid::Grid;
use crate::simulation::output::{GridStats, RunSummary, Snapshot};
use crate::simulation::relocation::{step, StepOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoopState {
    Running,
    /// No occupied cell is unhappy
    Converged,
    /// Tick budget used up
    ExhaustedBudget,
    /// Unhappy cells remain but no empty cell exists (`StallPolicy::Halt` only)
    Stalled,
}

impl LoopState {
    pub fn is_terminal(self) -> bool {
        self != LoopState::Running
    }
}

pub struct SimulationLoop<R: Rng = ChaCha8Rng> {
    grid: Grid,
    rng: R,
    relocation: RelocationPolicy,
    on_stall: StallPolicy,
    budget: Tick,
    snapshot_interval: Tick,
    tick: Tick,
    state: LoopState,
    moves: u64,
    stalled_ticks: u64,
    initial: GridStats,
    seed: Option<u64>,
}

impl SimulationLoop<ChaCha8Rng> {
    /// Build a random grid from the config and a seeded ChaCha RNG
    ///
    /// A seed is drawn from the thread RNG when the config has none.
    pub fn new(config: &SimulationConfig) -> Result<Self> {
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let grid = Grid::new(config, &mut rng)?;
        let mut sim = Self::with_grid(grid, rng, config)?;
        sim.seed = Some(seed);
        Ok(sim)
    }
}

impl<R: Rng> SimulationLoop<R> {
    /// Drive an existing grid with the loop parameters of `config`
    pub fn with_grid(grid: Grid, rng: R, config: &SimulationConfig) -> Result<Self> {
        if config.snapshot_interval == 0 {
            return Err(SimError::config("snapshot_interval must be positive"));
        }
        let initial = GridStats::of(&grid);
        let mut sim = Self {
            grid,
            rng,
            relocation: config.relocation,
            on_stall: config.on_stall,
            budget: config.iterations,
            snapshot_interval: config.snapshot_interval,
            tick: 0,
            state: LoopState::Running,
            moves: 0,
            stalled_ticks: 0,
            initial,
            seed: None,
        };
        sim.state = sim.classify();
        Ok(sim)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    pub fn budget(&self) -> Tick {
        self.budget
    }

    pub fn moves(&self) -> u64 {
        self.moves
    }

    pub fn stalled_ticks(&self) -> u64 {
        self.stalled_ticks
    }

    /// Seed the RNG was built from, when the loop created it
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.grid, self.tick, self.state)
    }

    fn classify(&self) -> LoopState {
        if self.grid.is_converged() {
            LoopState::Converged
        } else if self.tick >= self.budget {
            LoopState::ExhaustedBudget
        } else {
            LoopState::Running
        }
    }

    /// Advance one tick; a no-op once the loop is terminal
    ///
    /// Only an invariant violation is returned as an error; a missing empty
    /// cell is handled according to the stall policy.
    pub fn tick(&mut self) -> Result<LoopState> {
        if self.state.is_terminal() {
            return Ok(self.state);
        }

        let outcome = step(&mut self.grid, self.relocation, &mut self.rng);
        self.tick += 1;

        match outcome {
            Ok(StepOutcome::Moved(_)) => self.moves += 1,
            Ok(StepOutcome::Settled) => {}
            Err(SimError::NoEmptyCellAvailable) => {
                self.stalled_ticks += 1;
                if self.on_stall == StallPolicy::Halt {
                    tracing::warn!(
                        "No empty cell for {} unhappy cells at tick {}",
                        self.grid.unhappy().len(),
                        self.tick
                    );
                    self.state = LoopState::Stalled;
                    return Ok(self.state);
                }
            }
            Err(err) => {
                tracing::error!("Simulation aborted at tick {}: {}", self.tick, err);
                return Err(err);
            }
        }

        self.state = self.classify();
        if self.state.is_terminal() {
            tracing::info!(
                "Loop finished in state {:?} after {} ticks ({} moves)",
                self.state,
                self.tick,
                self.moves
            );
        }
        Ok(self.state)
    }

    /// Tick until a terminal state
    pub fn run(&mut self) -> Result<LoopState> {
        while !self.state.is_terminal() {
            self.tick()?;
        }
        Ok(self.state)
    }

    pub fn summary(&self, snapshots: u64, elapsed: Duration) -> RunSummary {
        RunSummary::new(
            self.state,
            self.tick,
            self.moves,
            self.stalled_ticks,
            snapshots,
            self.initial,
            GridStats::of(&self.grid),
            elapsed,
        )
    }

    /// Consume the loop into its sampled snapshot sequence
    pub fn snapshots(self) -> Snapshots<R> {
        Snapshots {
            sim: self,
            last_sampled: None,
            emitted: 0,
            done: false,
        }
    }
}

/// Finite, single-pass sequence of sampled snapshots
///
/// Yields the initial grid, then the grid after every tick divisible by the
/// snapshot interval, then the terminal grid if it was not already yielded.
/// An invariant violation is yielded once as an error and ends the sequence.
pub struct Snapshots<R: Rng = ChaCha8Rng> {
    sim: SimulationLoop<R>,
    last_sampled: Option<Tick>,
    emitted: u64,
    done: bool,
}

impl<R: Rng> Snapshots<R> {
    pub fn simulation(&self) -> &SimulationLoop<R> {
        &self.sim
    }

    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    pub fn into_simulation(self) -> SimulationLoop<R> {
        self.sim
    }

    fn sample(&mut self) -> Snapshot {
        self.last_sampled = Some(self.sim.tick);
        self.emitted += 1;
        self.sim.snapshot()
    }
}

impl<R: Rng> Iterator for Snapshots<R> {
    type Item = Result<Snapshot>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.last_sampled.is_none() {
            if self.sim.state.is_terminal() {
                self.done = true;
            }
            return Some(Ok(self.sample()));
        }

        loop {
            if self.sim.state.is_terminal() {
                self.done = true;
                if self.last_sampled == Some(self.sim.tick) {
                    return None;
                }
                return Some(Ok(self.sample()));
            }

            match self.sim.tick() {
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
                Ok(state) => {
                    if state.is_terminal() {
                        self.done = true;
                        return Some(Ok(self.sample()));
                    }
                    if self.sim.tick % self.sim.snapshot_interval == 0 {
                        return Some(Ok(self.sample()));
                    }
                }
            }
        }
    }
}
