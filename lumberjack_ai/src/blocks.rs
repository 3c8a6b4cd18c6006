// Block vocabulary: named ids, the standard classifier sets, wood species,
// and the safety predicates built on top of them.
//
// Ids follow the classic numeric block registry (air = 0, log = 17, ...).
// Only the blocks the planner reasons about are named; anything else is
// still classifiable by number.
//
// The standard sets are process-wide `LazyLock` statics because they are
// immutable and shared by every planner:
//
// - `AIR`, `LOGS`, `LEAVES`, `TREE_STUFF` (logs and leaves).
// - `SAFE_GROUND`: solid, non-falling blocks the agent can stand on.
// - `SAFE_SIDE`: anything that is not a liquid, fire or cactus.
// - `SAFE_CEILING`: safe sides that also won't fall onto the agent.
//
// `Safety` bundles the three safety sets so callers can swap in stricter or
// looser rules; `Safety::default()` uses the statics.
//
// See also: `block_set.rs` for the set type, `scoring.rs` and
// `large_tree.rs` which consume the safety predicates.

use crate::block_set::BlockSet;
use crate::types::{BlockState, VoxelCoord};
use crate::world::WorldAccessor;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

// ---------------------------------------------------------------------------
// Block ids
// ---------------------------------------------------------------------------

pub const AIR_ID: u16 = 0;
pub const STONE: u16 = 1;
pub const GRASS: u16 = 2;
pub const DIRT: u16 = 3;
pub const COBBLESTONE: u16 = 4;
pub const PLANKS: u16 = 5;
pub const SAPLING: u16 = 6;
pub const BEDROCK: u16 = 7;
pub const FLOWING_WATER: u16 = 8;
pub const WATER: u16 = 9;
pub const FLOWING_LAVA: u16 = 10;
pub const LAVA: u16 = 11;
pub const SAND: u16 = 12;
pub const GRAVEL: u16 = 13;
pub const LOG: u16 = 17;
pub const LEAVES_ID: u16 = 18;
pub const TALL_GRASS: u16 = 31;
pub const DEAD_BUSH: u16 = 32;
pub const YELLOW_FLOWER: u16 = 37;
pub const RED_FLOWER: u16 = 38;
pub const TORCH: u16 = 50;
pub const FIRE: u16 = 51;
pub const SNOW_LAYER: u16 = 78;
pub const CACTUS: u16 = 81;
pub const LEAVES2: u16 = 161;
pub const LOG2: u16 = 162;
pub const DOUBLE_PLANT: u16 = 175;

/// Short name for display, if the id is one of the named blocks above.
pub fn block_name(id: u16) -> Option<&'static str> {
    Some(match id {
        AIR_ID => "Air",
        STONE => "Stone",
        GRASS => "Grass",
        DIRT => "Dirt",
        COBBLESTONE => "Cobblestone",
        PLANKS => "Planks",
        SAPLING => "Sapling",
        BEDROCK => "Bedrock",
        FLOWING_WATER => "Flowing Water",
        WATER => "Water",
        FLOWING_LAVA => "Flowing Lava",
        LAVA => "Lava",
        SAND => "Sand",
        GRAVEL => "Gravel",
        LOG => "Log",
        LEAVES_ID => "Leaves",
        TALL_GRASS => "Tall Grass",
        DEAD_BUSH => "Dead Bush",
        YELLOW_FLOWER => "Dandelion",
        RED_FLOWER => "Flower",
        TORCH => "Torch",
        FIRE => "Fire",
        SNOW_LAYER => "Snow",
        CACTUS => "Cactus",
        LEAVES2 => "Leaves2",
        LOG2 => "Log2",
        DOUBLE_PLANT => "Double Plant",
        _ => return None,
    })
}

// ---------------------------------------------------------------------------
// Standard sets
// ---------------------------------------------------------------------------

pub static AIR: LazyLock<BlockSet> = LazyLock::new(|| BlockSet::new(&[AIR_ID]));

pub static LOGS: LazyLock<BlockSet> = LazyLock::new(|| BlockSet::new(&[LOG, LOG2]));

pub static LEAVES: LazyLock<BlockSet> = LazyLock::new(|| BlockSet::new(&[LEAVES_ID, LEAVES2]));

pub static TREE_STUFF: LazyLock<BlockSet> = LazyLock::new(|| LOGS.union(&LEAVES));

/// Blocks that fall when unsupported.
pub static FALLING: LazyLock<BlockSet> = LazyLock::new(|| BlockSet::new(&[SAND, GRAVEL]));

/// Blocks that hurt the agent on contact.
pub static DANGEROUS: LazyLock<BlockSet> = LazyLock::new(|| {
    BlockSet::new(&[FLOWING_WATER, WATER, FLOWING_LAVA, LAVA, FIRE, CACTUS])
});

pub static SAFE_GROUND: LazyLock<BlockSet> = LazyLock::new(|| {
    BlockSet::new(&[
        STONE,
        GRASS,
        DIRT,
        COBBLESTONE,
        PLANKS,
        BEDROCK,
        LOG,
        LOG2,
        LEAVES_ID,
        LEAVES2,
    ])
});

pub static SAFE_SIDE: LazyLock<BlockSet> = LazyLock::new(|| DANGEROUS.invert());

pub static SAFE_CEILING: LazyLock<BlockSet> =
    LazyLock::new(|| DANGEROUS.union(&FALLING).invert());

// ---------------------------------------------------------------------------
// Wood species
// ---------------------------------------------------------------------------

/// Tree species, as encoded in the meta of the log, leaves and sapling
/// blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WoodType {
    Oak,
    Spruce,
    Birch,
    Jungle,
    Acacia,
    DarkOak,
}

impl WoodType {
    pub const ALL: [WoodType; 6] = [
        WoodType::Oak,
        WoodType::Spruce,
        WoodType::Birch,
        WoodType::Jungle,
        WoodType::Acacia,
        WoodType::DarkOak,
    ];

    /// The log block id that carries this species.
    pub fn log_block(self) -> u16 {
        match self {
            Self::Oak | Self::Spruce | Self::Birch | Self::Jungle => LOG,
            Self::Acacia | Self::DarkOak => LOG2,
        }
    }

    /// Species bits of the log meta (the low two bits; the high two are the
    /// log's axis).
    pub fn log_meta(self) -> u8 {
        match self {
            Self::Oak | Self::Acacia => 0,
            Self::Spruce | Self::DarkOak => 1,
            Self::Birch => 2,
            Self::Jungle => 3,
        }
    }

    /// Meta of the sapling that grows this species.
    pub fn sapling_meta(self) -> u8 {
        match self {
            Self::Oak => 0,
            Self::Spruce => 1,
            Self::Birch => 2,
            Self::Jungle => 3,
            Self::Acacia => 4,
            Self::DarkOak => 5,
        }
    }

    /// A log of this species with the given axis bits (0..4).
    pub fn log_state(self, axis: u8) -> BlockState {
        BlockState::new(self.log_block(), self.log_meta() | ((axis & 3) << 2))
    }

    /// Every log block of this species, in all four orientations.
    pub fn log_blocks(self) -> BlockSet {
        let entries: Vec<(u16, u8)> = (0..4)
            .map(|axis| (self.log_block(), self.log_meta() | (axis << 2)))
            .collect();
        BlockSet::with_meta(&entries)
    }

    pub fn sapling_state(self) -> BlockState {
        BlockState::new(SAPLING, self.sapling_meta())
    }
}

// ---------------------------------------------------------------------------
// Safety predicates
// ---------------------------------------------------------------------------

/// The four horizontal neighbours of a column.
const SIDE_OFFSETS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Which blocks are safe to stand on, stand next to, and stand under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Safety {
    pub ground: BlockSet,
    pub side: BlockSet,
    pub ceiling: BlockSet,
}

impl Default for Safety {
    fn default() -> Self {
        Self {
            ground: SAFE_GROUND.clone(),
            side: SAFE_SIDE.clone(),
            ceiling: SAFE_CEILING.clone(),
        }
    }
}

impl Safety {
    pub fn safe_ground_at<W: WorldAccessor + ?Sized>(&self, world: &W, pos: VoxelCoord) -> bool {
        self.ground.is_at(world, pos)
    }

    /// All four horizontal neighbours of `pos` are safe to stand next to.
    pub fn safe_side_around<W: WorldAccessor + ?Sized>(&self, world: &W, pos: VoxelCoord) -> bool {
        SIDE_OFFSETS
            .iter()
            .all(|&(dx, dz)| self.side.is_at(world, pos.offset(dx, 0, dz)))
    }

    /// Safe neighbours around `pos` and a safe block directly above it.
    pub fn safe_side_and_ceiling_around<W: WorldAccessor + ?Sized>(
        &self,
        world: &W,
        pos: VoxelCoord,
    ) -> bool {
        self.safe_side_around(world, pos) && self.ceiling.is_at(world, pos.up(1))
    }
}
