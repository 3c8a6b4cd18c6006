// Scenario generation: deterministic test worlds with trees in them.
//
// Builds the worlds the planner is exercised against in unit tests, the
// end-to-end harness and the benchmarks: a ground plane, single-trunk trees,
// 2×2 large trees, and a scattered forest. Trunks are exact columns (no
// jitter) so tests can reason about their heights; only the leaf canopy and
// the forest layout draw from the `GameRng`.
//
// Canopy leaves are only placed into air, and never into the trunk's own
// columns, so the trunk stays the only trunk-set material around a tree.
//
// See also: `world.rs` for the grid being populated, `blocks.rs` for the
// species encoding of logs and leaves, `harvest_tests` which builds its
// scenarios here.
//
// **Critical constraint: determinism.** All randomness comes from the
// `GameRng` passed by the caller. Same seed, same world.

use crate::blocks::{LEAVES_ID, LEAVES2, LOG, WoodType};
use crate::prng::GameRng;
use crate::types::{BlockState, VoxelCoord};
use crate::world::VoxelWorld;

/// Shape of a generated tree.
#[derive(Clone, Debug)]
pub struct TreeParams {
    pub wood: WoodType,
    /// Trunk height in blocks, starting at the base level.
    pub height: i32,
    /// Horizontal reach of the canopy beyond the trunk. 0 disables leaves.
    pub canopy_radius: i32,
    /// Number of levels at the top of the trunk the canopy spans.
    pub canopy_layers: i32,
    /// Chance that an eligible canopy cell gets a leaf.
    pub leaf_density: f64,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            wood: WoodType::Oak,
            height: 6,
            canopy_radius: 2,
            canopy_layers: 3,
            leaf_density: 0.8,
        }
    }
}

/// Voxels placed for one tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeGenResult {
    /// Lower corner of the trunk footprint at the base level.
    pub base: VoxelCoord,
    pub trunk_voxels: Vec<VoxelCoord>,
    pub leaf_voxels: Vec<VoxelCoord>,
}

/// Fill the whole horizontal layer at `y` with `block`.
pub fn fill_floor(world: &mut VoxelWorld, y: i32, block: BlockState) {
    let max_x = world.size_x as i32 - 1;
    let max_z = world.size_z as i32 - 1;
    world.fill(VoxelCoord::new(0, y, 0), VoxelCoord::new(max_x, y, max_z), block);
}

/// A single-column tree standing at `base`.
pub fn generate_tree(
    world: &mut VoxelWorld,
    base: VoxelCoord,
    params: &TreeParams,
    rng: &mut GameRng,
) -> TreeGenResult {
    grow(world, base, 1, params, rng)
}

/// A 2×2 tree whose footprint extends +x/+z from `base`.
pub fn generate_large_tree(
    world: &mut VoxelWorld,
    base: VoxelCoord,
    params: &TreeParams,
    rng: &mut GameRng,
) -> TreeGenResult {
    grow(world, base, 2, params, rng)
}

/// Scatter `count` single-column trees with their bases on the layer above
/// `ground_y`, at least `spacing` columns apart. Trees that do not fit are
/// skipped, so fewer than `count` may be returned.
pub fn generate_forest(
    world: &mut VoxelWorld,
    ground_y: i32,
    count: usize,
    spacing: i32,
    params: &TreeParams,
    rng: &mut GameRng,
) -> Vec<TreeGenResult> {
    let margin = params.canopy_radius + 1;
    let max_x = world.size_x as i32 - margin;
    let max_z = world.size_z as i32 - margin;
    if max_x <= margin || max_z <= margin {
        return Vec::new();
    }

    let mut trees: Vec<TreeGenResult> = Vec::new();
    // Bounded retries keep a crowded world from looping forever.
    let mut attempts = count * 8;
    while trees.len() < count && attempts > 0 {
        attempts -= 1;
        let x = rng.range_i32(margin, max_x);
        let z = rng.range_i32(margin, max_z);
        let crowded = trees.iter().any(|t| {
            (t.base.x - x).abs() < spacing && (t.base.z - z).abs() < spacing
        });
        if crowded {
            continue;
        }
        let base = VoxelCoord::new(x, ground_y + 1, z);
        trees.push(generate_tree(world, base, params, rng));
    }
    trees
}

fn grow(
    world: &mut VoxelWorld,
    base: VoxelCoord,
    width: i32,
    params: &TreeParams,
    rng: &mut GameRng,
) -> TreeGenResult {
    let log = params.wood.log_state(0);
    let mut trunk_voxels = Vec::new();
    for y in base.y..base.y + params.height {
        for dx in 0..width {
            for dz in 0..width {
                let coord = VoxelCoord::new(base.x + dx, y, base.z + dz);
                world.set(coord, log);
                trunk_voxels.push(coord);
            }
        }
    }

    let mut leaf_voxels = Vec::new();
    if params.canopy_radius > 0 {
        let leaves = leaves_state(params.wood);
        let top = base.y + params.height;
        let r = params.canopy_radius;
        // Distance is measured from the trunk footprint, not its corner.
        let reach = |d: i32| {
            if d < 0 {
                -d
            } else if d >= width {
                d - width + 1
            } else {
                0
            }
        };
        for y in top - params.canopy_layers..=top {
            for dx in -r..width + r {
                for dz in -r..width + r {
                    let (ex, ez) = (reach(dx), reach(dz));
                    if ex * ex + ez * ez > r * r {
                        continue;
                    }
                    let coord = VoxelCoord::new(base.x + dx, y, base.z + dz);
                    let in_trunk_column = (0..width).contains(&dx) && (0..width).contains(&dz);
                    if in_trunk_column && y < top {
                        continue;
                    }
                    if world.get(coord) != BlockState::AIR {
                        continue;
                    }
                    if rng.random_bool(params.leaf_density) {
                        world.set(coord, leaves);
                        leaf_voxels.push(coord);
                    }
                }
            }
        }
    }

    TreeGenResult {
        base,
        trunk_voxels,
        leaf_voxels,
    }
}

/// Leaves share the species bits of the matching log.
fn leaves_state(wood: WoodType) -> BlockState {
    let id = if wood.log_block() == LOG {
        LEAVES_ID
    } else {
        LEAVES2
    };
    BlockState::new(id, wood.log_meta())
}
