use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use schelling::core::config::SimulationConfig;
use schelling::core::types::RelocationPolicy;
use schelling::simulation::{step, Grid};

fn bench_steps(c: &mut Criterion) {
    let config = SimulationConfig {
        size: 200,
        happiness_cup: 4,
        ..Default::default()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let grid = Grid::new(&config, &mut rng).unwrap();

    for policy in [RelocationPolicy::Swap, RelocationPolicy::ColorTransfer] {
        c.bench_function(&format!("1000 steps 200x200 {:?}", policy), |b| {
            b.iter_batched(
                || (grid.clone(), ChaCha8Rng::seed_from_u64(11)),
                |(mut grid, mut rng)| {
                    for _ in 0..1000 {
                        let _ = black_box(step(&mut grid, policy, &mut rng));
                    }
                    grid
                },
                BatchSize::LargeInput,
            )
        });
    }
}

criterion_group!(benches, bench_steps);
criterion_main!(benches);
