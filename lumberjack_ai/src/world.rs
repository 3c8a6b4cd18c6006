// World access for the planner.
//
// The planner never owns the world. It reads it through `WorldAccessor`, a
// synchronous snapshot query that maps a coordinate to a packed
// `BlockState`. Implementations must be side-effect free and must answer for
// any coordinate: unloaded or out-of-range positions report air rather than
// failing.
//
// `VoxelWorld` is the in-memory implementation used by tests, benchmarks and
// the scenario builders in `tree_gen.rs`. It is a dense grid stored as a flat
// `Vec<BlockState>` indexed by `x + z * size_x + y * size_x * size_z`, giving
// O(1) reads and writes. Out-of-bounds reads return air; out-of-bounds writes
// are no-ops.
//
// See also: `block_set.rs` (`BlockSet::is_at`) which is the main consumer,
// `harvest_tests` which executes queued tasks against a `VoxelWorld`.

use crate::types::{BlockState, VoxelCoord};

/// Read-only block lookup.
pub trait WorldAccessor {
    /// The block at `pos`. Air for anything not loaded.
    fn block_at(&self, pos: VoxelCoord) -> BlockState;
}

impl<W: WorldAccessor + ?Sized> WorldAccessor for &W {
    fn block_at(&self, pos: VoxelCoord) -> BlockState {
        (**self).block_at(pos)
    }
}

/// Dense 3D block grid with its minimum corner at the origin.
#[derive(Clone, Debug)]
pub struct VoxelWorld {
    /// Flat storage: index = x + z * size_x + y * size_x * size_z.
    blocks: Vec<BlockState>,
    pub size_x: u32,
    pub size_y: u32,
    pub size_z: u32,
}

impl VoxelWorld {
    /// An all-air world.
    pub fn new(size_x: u32, size_y: u32, size_z: u32) -> Self {
        let total = (size_x as usize) * (size_y as usize) * (size_z as usize);
        Self {
            blocks: vec![BlockState::AIR; total],
            size_x,
            size_y,
            size_z,
        }
    }

    fn in_bounds(&self, coord: VoxelCoord) -> bool {
        let within = |v: i32, size: u32| u32::try_from(v).is_ok_and(|v| v < size);
        within(coord.x, self.size_x) && within(coord.y, self.size_y) && within(coord.z, self.size_z)
    }

    fn index(&self, coord: VoxelCoord) -> Option<usize> {
        if !self.in_bounds(coord) {
            return None;
        }
        let (sx, sz) = (self.size_x as usize, self.size_z as usize);
        Some(coord.x as usize + coord.z as usize * sx + coord.y as usize * sx * sz)
    }

    /// The block at `coord`, or air outside the grid.
    pub fn get(&self, coord: VoxelCoord) -> BlockState {
        self.index(coord).map_or(BlockState::AIR, |i| self.blocks[i])
    }

    /// Write a block. No-op for out-of-bounds coordinates.
    pub fn set(&mut self, coord: VoxelCoord, block: BlockState) {
        if let Some(i) = self.index(coord) {
            self.blocks[i] = block;
        }
    }

    /// Set every block in the inclusive box spanned by two corners. The
    /// corners may be given in any order.
    pub fn fill(&mut self, a: VoxelCoord, b: VoxelCoord, block: BlockState) {
        let (low, high) = box_corners(a, b);
        for y in low.y..=high.y {
            for z in low.z..=high.z {
                for x in low.x..=high.x {
                    self.set(VoxelCoord::new(x, y, z), block);
                }
            }
        }
    }

    /// Replace every block in the inclusive box with air.
    pub fn clear(&mut self, a: VoxelCoord, b: VoxelCoord) {
        self.fill(a, b, BlockState::AIR);
    }

    /// Number of non-air blocks in the whole grid.
    pub fn solid_count(&self) -> usize {
        self.blocks.iter().filter(|b| **b != BlockState::AIR).count()
    }
}

impl WorldAccessor for VoxelWorld {
    fn block_at(&self, pos: VoxelCoord) -> BlockState {
        self.get(pos)
    }
}

/// Normalize two corners into (min, max) per axis.
pub fn box_corners(a: VoxelCoord, b: VoxelCoord) -> (VoxelCoord, VoxelCoord) {
    (
        VoxelCoord::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
        VoxelCoord::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
    )
}
