//! Integration tests for the relocation loop
//!
//! These tests drive whole runs through the public API:
//! - Termination states (converged, budget, stalled)
//! - Snapshot sampling and consistency
//! - Population conservation across moves

use schelling::core::config::SimulationConfig;
use schelling::core::types::{
    CellId, Color, EdgePolicy, RelocationPolicy, StallPolicy, ThresholdPolicy,
};
use schelling::simulation::{step, Grid, HappinessRule, LoopState, SimulationLoop, StepOutcome};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn config(seed: u64) -> SimulationConfig {
    SimulationConfig {
        size: 16,
        white_rate: 0.35,
        black_rate: 0.35,
        happiness_cup: 3,
        iterations: 2_000,
        snapshot_interval: 100,
        seed: Some(seed),
        ..Default::default()
    }
}

#[test]
fn test_converged_grid_reports_immediately() {
    let grid = Grid::with_layout(
        3,
        vec![Color::TypeA; 9],
        HappinessRule::new(3, ThresholdPolicy::AtLeast),
        EdgePolicy::Bounded,
    )
    .unwrap();
    let before = grid.cells().to_vec();

    let mut sim =
        SimulationLoop::with_grid(grid, ChaCha8Rng::seed_from_u64(0), &config(0)).unwrap();
    assert_eq!(sim.state(), LoopState::Converged);
    assert_eq!(sim.tick().unwrap(), LoopState::Converged);
    assert_eq!(sim.current_tick(), 0);
    assert_eq!(sim.grid().cells(), &before[..]);
}

#[test]
fn test_step_on_converged_grid_is_noop() {
    let mut grid = Grid::with_layout(
        2,
        vec![Color::TypeB, Color::Empty, Color::Empty, Color::TypeB],
        HappinessRule::new(1, ThresholdPolicy::AtLeast),
        EdgePolicy::Bounded,
    )
    .unwrap();
    assert!(grid.is_converged());
    let before = grid.cells().to_vec();

    let mut rng = ChaCha8Rng::seed_from_u64(8);
    for _ in 0..10 {
        assert_eq!(
            step(&mut grid, RelocationPolicy::Swap, &mut rng).unwrap(),
            StepOutcome::Settled
        );
    }
    assert_eq!(grid.cells(), &before[..]);
}

#[test]
fn test_single_unhappy_cell_converges_in_one_tick() {
    let mut layout = vec![Color::Empty; 9];
    layout[0] = Color::TypeA;
    let grid = Grid::with_layout(
        3,
        layout,
        HappinessRule::new(1, ThresholdPolicy::AtLeast),
        EdgePolicy::Bounded,
    )
    .unwrap();
    assert!(grid.unhappy().contains(CellId(0)));

    let cfg = SimulationConfig {
        relocation: RelocationPolicy::ColorTransfer,
        ..config(0)
    };
    let mut sim = SimulationLoop::with_grid(grid, ChaCha8Rng::seed_from_u64(2), &cfg).unwrap();
    assert_eq!(sim.run().unwrap(), LoopState::Converged);
    assert_eq!(sim.current_tick(), 1);
    assert_eq!(sim.moves(), 1);
    assert!(sim.grid().cell(CellId(0)).is_empty());
}

#[test]
fn test_runs_terminate_with_consistent_snapshots() {
    for seed in 0..4 {
        for relocation in [RelocationPolicy::Swap, RelocationPolicy::ColorTransfer] {
            let cfg = SimulationConfig {
                relocation,
                ..config(seed)
            };
            let sim = SimulationLoop::new(&cfg).unwrap();
            let mut snapshots = sim.snapshots();

            let mut last = None;
            for snapshot in snapshots.by_ref() {
                let snapshot = snapshot.unwrap();
                let stats = snapshot.stats;
                assert_eq!(stats.happy + stats.unhappy, stats.occupied());
                let empties = snapshot.cells.iter().filter(|c| c.state == Color::Empty).count();
                assert_eq!(stats.empty, empties);
                assert!(snapshot
                    .cells
                    .iter()
                    .filter(|c| c.state == Color::Empty)
                    .all(|c| c.is_happy));
                last = Some(snapshot);
            }

            let last = last.expect("at least the initial snapshot");
            assert!(last.state.is_terminal());
            assert!(last.tick <= cfg.iterations);
            if last.state == LoopState::Converged {
                assert_eq!(last.stats.unhappy, 0);
            }
            snapshots.simulation().grid().check_invariants().unwrap();
        }
    }
}

#[test]
fn test_moves_conserve_population() {
    let mut sim = SimulationLoop::new(&config(99)).unwrap();
    let count = |sim: &SimulationLoop, color: Color| {
        sim.grid().cells().iter().filter(|c| c.state == color).count()
    };
    let type_a = count(&sim, Color::TypeA);
    let type_b = count(&sim, Color::TypeB);

    sim.run().unwrap();
    assert!(sim.moves() > 0);
    assert_eq!(count(&sim, Color::TypeA), type_a);
    assert_eq!(count(&sim, Color::TypeB), type_b);
}

#[test]
fn test_snapshots_cover_initial_and_final_state() {
    let cfg = SimulationConfig {
        happiness_cup: 8,
        iterations: 250,
        snapshot_interval: 100,
        ..config(5)
    };
    let sim = SimulationLoop::new(&cfg).unwrap();
    let ticks: Vec<u64> = sim.snapshots().map(|s| s.unwrap().tick).collect();
    assert_eq!(ticks, vec![0, 100, 200, 250]);
}

#[test]
fn test_full_grid_stalls_under_halt_policy() {
    let cfg = SimulationConfig {
        size: 2,
        white_rate: 1.0,
        black_rate: 0.0,
        happiness_cup: 4,
        on_stall: StallPolicy::Halt,
        ..config(3)
    };
    let mut sim = SimulationLoop::new(&cfg).unwrap();
    assert_eq!(sim.run().unwrap(), LoopState::Stalled);

    let summary = sim.summary(0, std::time::Duration::from_millis(1));
    assert_eq!(summary.final_state, LoopState::Stalled);
    assert_eq!(summary.stalled_ticks, 1);
    assert!(summary.to_json().contains("\"Stalled\""));
}
