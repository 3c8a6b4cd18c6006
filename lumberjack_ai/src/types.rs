// Core value types shared across the planner.
//
// Defines world positions (`VoxelCoord`) and the packed block encoding
// (`BlockState`) that the `WorldAccessor` returns. Both are small `Copy`
// values and derive `Serialize`/`Deserialize` so queued tasks can be logged
// or shipped to an executor as JSON.
//
// See also: `world.rs` for the accessor that produces `BlockState`s,
// `block_set.rs` for classifying them.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Spatial types
// ---------------------------------------------------------------------------

/// A position in the 3D voxel grid, in block units.
///
/// Y is vertical (up is positive). The usual world height is 0..=255 but
/// nothing here enforces it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VoxelCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl VoxelCoord {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// This coordinate shifted by the given deltas.
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// The coordinate `dy` levels above (negative goes down).
    pub const fn up(self, dy: i32) -> Self {
        self.offset(0, dy, 0)
    }

    /// Manhattan distance between two coordinates.
    pub fn manhattan_distance(self, other: Self) -> u32 {
        ((self.x - other.x).unsigned_abs())
            + ((self.y - other.y).unsigned_abs())
            + ((self.z - other.z).unsigned_abs())
    }
}

impl fmt::Display for VoxelCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

// ---------------------------------------------------------------------------
// Block encoding
// ---------------------------------------------------------------------------

/// Bits of a `BlockState` used for the meta value.
pub const META_BITS: u32 = 4;

/// A block type id and its meta value packed as `id << 4 | meta`.
///
/// The id space is 12 bits (0..4096) and meta is 4 bits (0..16), so every
/// pair fits a `u16`. The raw value doubles as the bit index into a meta
/// `BlockSet`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockState(pub u16);

impl BlockState {
    /// The encoding of air (id 0, meta 0). Also what the world reports for
    /// unloaded regions.
    pub const AIR: Self = Self(0);

    /// Pack an id and meta. Both are masked to their field width, so callers
    /// validating input should use `BlockSet::try_new` style checks first.
    pub const fn new(id: u16, meta: u8) -> Self {
        Self(((id & 0x0FFF) << META_BITS) | (meta as u16 & 0x0F))
    }

    pub const fn id(self) -> u16 {
        self.0 >> META_BITS
    }

    pub const fn meta(self) -> u8 {
        (self.0 & 0x0F) as u8
    }
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.id(), self.meta())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voxel_coord_manhattan_distance() {
        let a = VoxelCoord::new(0, 0, 0);
        let b = VoxelCoord::new(3, -4, 5);
        assert_eq!(a.manhattan_distance(b), 12);
        assert_eq!(b.manhattan_distance(a), 12);
    }

    #[test]
    fn voxel_coord_offsets() {
        let c = VoxelCoord::new(4, 10, -2);
        assert_eq!(c.up(3), VoxelCoord::new(4, 13, -2));
        assert_eq!(c.up(-1), VoxelCoord::new(4, 9, -2));
        assert_eq!(c.offset(-1, 0, 1), VoxelCoord::new(3, 10, -1));
    }

    #[test]
    fn block_state_packs_id_and_meta() {
        let state = BlockState::new(17, 6);
        assert_eq!(state.0, 17 * 16 + 6);
        assert_eq!(state.id(), 17);
        assert_eq!(state.meta(), 6);
        assert_eq!(state.to_string(), "17:6");
    }

    #[test]
    fn block_state_covers_full_id_range() {
        let state = BlockState::new(4095, 15);
        assert_eq!(state.0, u16::MAX);
        assert_eq!(state.id(), 4095);
        assert_eq!(state.meta(), 15);
    }

    #[test]
    fn air_is_zero() {
        assert_eq!(BlockState::AIR, BlockState::default());
        assert_eq!(BlockState::AIR.id(), 0);
    }

    #[test]
    fn coord_serialization_roundtrip() {
        let c = VoxelCoord::new(-5, 64, 12);
        let json = serde_json::to_string(&c).unwrap();
        let restored: VoxelCoord = serde_json::from_str(&json).unwrap();
        assert_eq!(c, restored);
    }
}
