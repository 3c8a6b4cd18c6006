// Benchmarks for the hot paths of tree search: block classification and
// destination rating.
//
// `rate_destination` runs once per candidate column of every path search, so
// it dominates planner cost on a busy forest. The set-algebra benchmarks
// cover the promotion path (plain ∪ meta), which is the most expensive
// combination.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use lumberjack_ai::block_set::BlockSet;
use lumberjack_ai::blocks::{LOGS, SAFE_GROUND, STONE, WoodType};
use lumberjack_ai::config::HarvestConfig;
use lumberjack_ai::planner::HarvestPlanner;
use lumberjack_ai::prng::GameRng;
use lumberjack_ai::tree_gen::{self, TreeParams};
use lumberjack_ai::types::{BlockState, VoxelCoord};
use lumberjack_ai::world::VoxelWorld;
use std::hint::black_box;

fn forest(seed: u64) -> VoxelWorld {
    let mut world = VoxelWorld::new(64, 32, 64);
    tree_gen::fill_floor(&mut world, 0, BlockState::new(STONE, 0));
    let mut rng = GameRng::new(seed);
    tree_gen::generate_forest(&mut world, 0, 40, 5, &TreeParams::default(), &mut rng);
    world
}

fn bench_contains(c: &mut Criterion) {
    let world = forest(1);
    let plain = (*LOGS).clone();
    let meta = WoodType::Oak.log_blocks();
    let column: Vec<VoxelCoord> = (0..32).map(|y| VoxelCoord::new(20, y, 20)).collect();

    c.bench_function("block_set_is_at_plain", |b| {
        b.iter(|| column.iter().filter(|p| plain.is_at(&world, **p)).count())
    });
    c.bench_function("block_set_is_at_meta", |b| {
        b.iter(|| column.iter().filter(|p| meta.is_at(&world, **p)).count())
    });
}

fn bench_algebra(c: &mut Criterion) {
    let meta = WoodType::Birch.log_blocks();
    c.bench_function("block_set_union_promote", |b| {
        b.iter(|| black_box(&*SAFE_GROUND).union(black_box(&meta)))
    });
    c.bench_function("block_set_invert_meta", |b| {
        b.iter(|| black_box(&meta).invert())
    });

    let mut group = c.benchmark_group("block_set_new");
    for &n in &[4usize, 64, 1024] {
        let mut rng = GameRng::new(n as u64);
        let ids: Vec<u16> = (0..n).map(|_| rng.range_u64(0, 4096) as u16).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &ids, |b, ids| {
            b.iter(|| BlockSet::new(ids))
        });
    }
    group.finish();
}

fn bench_rate_destination(c: &mut Criterion) {
    let world = forest(2);
    let planner = HarvestPlanner::new(HarvestConfig::default());
    c.bench_function("rate_destination_layer", |b| {
        b.iter(|| {
            let mut accepted = 0u32;
            for x in 0..64 {
                for z in 0..64 {
                    let score = planner.rate_destination(&world, 10, VoxelCoord::new(x, 1, z));
                    if score >= 0.0 {
                        accepted += 1;
                    }
                }
            }
            black_box(accepted)
        })
    });
}

criterion_group!(benches, bench_contains, bench_algebra, bench_rate_destination);
criterion_main!(benches);
