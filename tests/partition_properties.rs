//! Property tests: partition bookkeeping survives arbitrary runs

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use schelling::core::error::SimError;
use schelling::core::types::{Color, EdgePolicy, RelocationPolicy, ThresholdPolicy};
use schelling::simulation::{step, Grid, HappinessRule};

fn threshold() -> impl Strategy<Value = ThresholdPolicy> {
    prop_oneof![Just(ThresholdPolicy::AtLeast), Just(ThresholdPolicy::Exceeds)]
}

fn edges() -> impl Strategy<Value = EdgePolicy> {
    prop_oneof![Just(EdgePolicy::Bounded), Just(EdgePolicy::Toroidal)]
}

fn relocation() -> impl Strategy<Value = RelocationPolicy> {
    prop_oneof![Just(RelocationPolicy::Swap), Just(RelocationPolicy::ColorTransfer)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn partitions_stay_consistent(
        size in 1usize..10,
        white in 0.0f64..0.5,
        black in 0.0f64..0.5,
        cup in 0u32..9,
        seed in any::<u64>(),
        threshold in threshold(),
        edges in edges(),
        relocation in relocation(),
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let rule = HappinessRule::new(cup, threshold);
        let mut grid = Grid::with_rates(size, white, black, rule, edges, &mut rng).unwrap();
        let occupied = grid.cells().iter().filter(|c| !c.is_empty()).count();

        for _ in 0..60 {
            match step(&mut grid, relocation, &mut rng) {
                Ok(_) | Err(SimError::NoEmptyCellAvailable) => {}
                Err(err) => prop_assert!(false, "unexpected error: {}", err),
            }

            prop_assert!(grid.check_invariants().is_ok());
            prop_assert_eq!(grid.happy().len() + grid.unhappy().len(), occupied);
            let empties = grid.cells().iter().filter(|c| c.state == Color::Empty).count();
            prop_assert_eq!(grid.empty().len(), empties);
        }
    }

    #[test]
    fn swap_keeps_cached_verdicts_exact(
        size in 2usize..10,
        cup in 1u32..6,
        seed in any::<u64>(),
        edges in edges(),
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let rule = HappinessRule::new(cup, ThresholdPolicy::AtLeast);
        let mut grid = Grid::with_rates(size, 0.35, 0.35, rule, edges, &mut rng).unwrap();

        for _ in 0..40 {
            match step(&mut grid, RelocationPolicy::Swap, &mut rng) {
                Ok(_) | Err(SimError::NoEmptyCellAvailable) => {}
                Err(err) => prop_assert!(false, "unexpected error: {}", err),
            }
            for cell in grid.cells() {
                prop_assert_eq!(cell.is_happy, grid.rule().is_happy(&grid, cell.id));
            }
        }
    }

    #[test]
    fn evaluation_is_idempotent(
        size in 1usize..10,
        cup in 0u32..9,
        seed in any::<u64>(),
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let rule = HappinessRule::new(cup, ThresholdPolicy::AtLeast);
        let mut grid =
            Grid::with_rates(size, 0.4, 0.4, rule, EdgePolicy::Bounded, &mut rng).unwrap();
        let happy = grid.happy().len();

        prop_assert!(grid.evaluate_all().unwrap().is_empty());
        prop_assert!(grid.evaluate_all().unwrap().is_empty());
        prop_assert_eq!(grid.happy().len(), happy);
    }
}
