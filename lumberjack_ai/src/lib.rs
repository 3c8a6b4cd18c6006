// lumberjack_ai: tree-harvest planning for a voxel-world agent.
//
// This crate decides *what* an automated agent should do to fell trees: which
// column to walk to, what to break, where to replant, and how to climb and
// clear a 2×2 trunk it cannot reach from the ground. It never moves the agent
// or touches the world itself. The host supplies a read-only world view and a
// task queue; a separate executor runs the queued tasks.
//
// Module overview:
// - `block_set.rs`:  BlockSet: bitset classifier over block ids, optionally per (id, meta).
// - `blocks.rs`:     Named block ids, the standard sets, WoodType, Safety predicates.
// - `scoring.rs`:    Destination rating for the host's path search.
// - `large_tree.rs`: LargeTreeState: 2×2 detection, spiral staircase, climb-and-clear plan.
// - `planner.rs`:    HarvestPlanner: mode state machine and the host-facing entry points.
// - `task.rs`:       Task / TaskQueue: the planner's output.
// - `config.rs`:     HarvestConfig: every tunable, loaded from JSON.
// - `error.rs`:      BlockSetError and TaskError.
// - `world.rs`:      WorldAccessor trait + VoxelWorld, a dense in-memory grid.
// - `tree_gen.rs`:   Deterministic scenario worlds for tests and benchmarks.
// - `types.rs`:      VoxelCoord, BlockState.
// - `prng`:          Re-exported from `lumberjack_prng`: xoshiro256++ PRNG with SplitMix64 seeding.
//
// **Critical constraint: determinism.** Planning is a pure function of the
// world snapshot, the agent position and the planner's own state. The only
// randomness (scenario generation) comes from a seeded `GameRng`.

pub mod block_set;
pub mod blocks;
pub mod config;
pub mod error;
pub mod large_tree;
pub mod planner;
pub use lumberjack_prng as prng;
pub mod scoring;
pub mod task;
pub mod tree_gen;
pub mod types;
pub mod world;
