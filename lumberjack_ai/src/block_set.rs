// Bitset classifier over block types.
//
// A `BlockSet` answers "is this block one of X" in O(1) with a single shift
// and mask. It comes in two resolutions, modelled as a closed enum:
//
// - `Plain`: one bit per block id (4096 ids = 64 words). Meta is ignored.
// - `Meta`: one bit per (id, meta) pair (4096 * 16 bits = 1024 words). Used
//   when the variant matters, e.g. one wood species out of a log block that
//   stores several species in its meta value.
//
// The bit index of an (id, meta) pair in a meta set is exactly the packed
// `BlockState` value, so `contains_encoded` is a direct lookup for both
// resolutions.
//
// Union and intersection of two plain sets stay plain. If either operand is
// a meta set the plain one is promoted first: each set id bit is broadcast
// across all 16 meta slots of that id (one id is one 16-bit lane of a meta
// word). Sets of different resolution are never combined bit-for-bit without
// that promotion.
//
// Sets are immutable once built. Every operation returns a new set.
// Equality and hashing are over the resolution tag plus the raw words, so a
// plain set never equals a meta set even when they classify identically.
//
// See also: `blocks.rs` for the named ids and the standard sets built from
// them, `world.rs` for the `WorldAccessor` that `is_at` reads through.

use crate::blocks;
use crate::error::BlockSetError;
use crate::types::{BlockState, META_BITS, VoxelCoord};
use crate::world::{WorldAccessor, box_corners};
use std::borrow::Cow;
use std::fmt;

/// Size of the block id space.
pub const MAX_BLOCK_IDS: usize = 4096;

/// Meta values per block id.
pub const META_VALUES: usize = 1 << META_BITS;

const PLAIN_WORDS: usize = MAX_BLOCK_IDS / 64;
const META_WORDS: usize = MAX_BLOCK_IDS * META_VALUES / 64;

/// Ids packed into one meta word (one 16-bit lane each).
const IDS_PER_META_WORD: usize = 64 / META_VALUES;
const META_LANE: u64 = (1 << META_VALUES) - 1;

/// Raw storage for one resolution. The field is private so a set can only be
/// built through the `BlockSet` constructors and always has the right length.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Bits(Box<[u64]>);

impl Bits {
    fn zeroed(words: usize) -> Self {
        Self(vec![0u64; words].into_boxed_slice())
    }

    fn set(&mut self, index: usize) {
        self.0[index / 64] |= 1u64 << (index & 63);
    }

    fn get(&self, index: usize) -> bool {
        self.0
            .get(index / 64)
            .is_some_and(|w| w & (1u64 << (index & 63)) != 0)
    }

    fn zip_with(a: &[u64], b: &[u64], op: impl Fn(u64, u64) -> u64) -> Self {
        debug_assert_eq!(a.len(), b.len());
        Self(a.iter().zip(b).map(|(x, y)| op(*x, *y)).collect())
    }
}

/// A set of block types, at either id or (id, meta) resolution.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum BlockSet {
    Plain(Bits),
    Meta(Bits),
}

impl BlockSet {
    /// The empty id-resolution set.
    pub fn empty() -> Self {
        Self::Plain(Bits::zeroed(PLAIN_WORDS))
    }

    /// A set of whole block ids.
    ///
    /// Panics if an id is outside `0..MAX_BLOCK_IDS`. Use [`Self::try_new`]
    /// for ids that come from data rather than code.
    pub fn new(ids: &[u16]) -> Self {
        match Self::try_new(ids) {
            Ok(set) => set,
            Err(e) => panic!("invalid BlockSet: {e}"),
        }
    }

    pub fn try_new(ids: &[u16]) -> Result<Self, BlockSetError> {
        let mut bits = Bits::zeroed(PLAIN_WORDS);
        for &id in ids {
            check_id(id)?;
            bits.set(id as usize);
        }
        Ok(Self::Plain(bits))
    }

    /// A set of specific (id, meta) pairs.
    ///
    /// Panics on an out-of-range id or meta, like [`Self::new`].
    pub fn with_meta(entries: &[(u16, u8)]) -> Self {
        match Self::try_with_meta(entries) {
            Ok(set) => set,
            Err(e) => panic!("invalid BlockSet: {e}"),
        }
    }

    pub fn try_with_meta(entries: &[(u16, u8)]) -> Result<Self, BlockSetError> {
        let mut bits = Bits::zeroed(META_WORDS);
        for &(id, meta) in entries {
            check_id(id)?;
            if meta as usize >= META_VALUES {
                return Err(BlockSetError::MetaOutOfRange {
                    id: id as u32,
                    meta: meta as u32,
                });
            }
            bits.set(BlockState::new(id, meta).0 as usize);
        }
        Ok(Self::Meta(bits))
    }

    pub fn is_meta(&self) -> bool {
        matches!(self, Self::Meta(_))
    }

    /// Whether the id is in the set. For a meta set this means "any meta of
    /// this id". Ids outside the id space are never contained.
    pub fn contains(&self, id: u16) -> bool {
        let id = id as usize;
        if id >= MAX_BLOCK_IDS {
            return false;
        }
        match self {
            Self::Plain(bits) => bits.get(id),
            Self::Meta(bits) => {
                let shift = (id % IDS_PER_META_WORD) * META_VALUES;
                (bits.0[id / IDS_PER_META_WORD] >> shift) & META_LANE != 0
            }
        }
    }

    /// Whether this exact (id, meta) pair is classified by the set. Plain
    /// sets ignore the meta.
    pub fn contains_with_meta(&self, id: u16, meta: u8) -> bool {
        if id as usize >= MAX_BLOCK_IDS || meta as usize >= META_VALUES {
            return false;
        }
        self.contains_encoded(BlockState::new(id, meta))
    }

    /// Membership test on a packed block as read from the world.
    pub fn contains_encoded(&self, block: BlockState) -> bool {
        match self {
            Self::Plain(bits) => bits.get(block.id() as usize),
            Self::Meta(bits) => bits.get(block.0 as usize),
        }
    }

    /// Whether the block at `pos` is in the set.
    pub fn is_at<W: WorldAccessor + ?Sized>(&self, world: &W, pos: VoxelCoord) -> bool {
        self.contains_encoded(world.block_at(pos))
    }

    /// Count matching blocks in the inclusive box between two corners.
    pub fn count_in<W: WorldAccessor + ?Sized>(
        &self,
        world: &W,
        a: VoxelCoord,
        b: VoxelCoord,
    ) -> usize {
        let (low, high) = box_corners(a, b);
        let mut count = 0;
        for y in low.y..=high.y {
            for z in low.z..=high.z {
                for x in low.x..=high.x {
                    if self.is_at(world, VoxelCoord::new(x, y, z)) {
                        count += 1;
                    }
                }
            }
        }
        count
    }

    pub fn union(&self, other: &BlockSet) -> BlockSet {
        self.combine(other, |a, b| a | b)
    }

    pub fn intersect(&self, other: &BlockSet) -> BlockSet {
        self.combine(other, |a, b| a & b)
    }

    /// The complement within the set's own resolution.
    pub fn invert(&self) -> BlockSet {
        match self {
            Self::Plain(bits) => Self::Plain(Bits(bits.0.iter().map(|w| !w).collect())),
            Self::Meta(bits) => Self::Meta(Bits(bits.0.iter().map(|w| !w).collect())),
        }
    }

    /// This set at (id, meta) resolution. A meta set is returned unchanged.
    pub fn to_meta(&self) -> BlockSet {
        Self::Meta(Bits(self.meta_words().into_owned().into_boxed_slice()))
    }

    pub fn is_empty(&self) -> bool {
        let words = match self {
            Self::Plain(bits) | Self::Meta(bits) => &bits.0,
        };
        words.iter().all(|w| *w == 0)
    }

    /// Contained block ids in ascending order. A meta set yields an id once if
    /// any of its metas is set.
    pub fn ids(&self) -> impl Iterator<Item = u16> + '_ {
        (0..MAX_BLOCK_IDS as u16).filter(move |id| self.contains(*id))
    }

    fn combine(&self, other: &BlockSet, op: impl Fn(u64, u64) -> u64) -> BlockSet {
        match (self, other) {
            (Self::Plain(a), Self::Plain(b)) => Self::Plain(Bits::zip_with(&a.0, &b.0, op)),
            _ => {
                let a = self.meta_words();
                let b = other.meta_words();
                Self::Meta(Bits::zip_with(&a, &b, op))
            }
        }
    }

    /// Words at meta resolution, promoting a plain set by broadcasting each
    /// id bit over its 16-bit meta lane.
    fn meta_words(&self) -> Cow<'_, [u64]> {
        match self {
            Self::Meta(bits) => Cow::Borrowed(&bits.0),
            Self::Plain(bits) => {
                let mut words = vec![0u64; META_WORDS];
                for id in 0..MAX_BLOCK_IDS {
                    if bits.get(id) {
                        let shift = (id % IDS_PER_META_WORD) * META_VALUES;
                        words[id / IDS_PER_META_WORD] |= META_LANE << shift;
                    }
                }
                Cow::Owned(words)
            }
        }
    }
}

impl Default for BlockSet {
    fn default() -> Self {
        Self::empty()
    }
}

fn check_id(id: u16) -> Result<(), BlockSetError> {
    if id as usize >= MAX_BLOCK_IDS {
        Err(BlockSetError::IdOutOfRange {
            id: id as u32,
            max: MAX_BLOCK_IDS as u32,
        })
    } else {
        Ok(())
    }
}

fn block_label(id: u16) -> Cow<'static, str> {
    match blocks::block_name(id) {
        Some(name) => Cow::Borrowed(name),
        None => Cow::Owned(format!("#{id}")),
    }
}

impl fmt::Display for BlockSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<String> = Vec::new();
        let prefix = match self {
            Self::Plain(_) => {
                for id in self.ids() {
                    entries.push(format!("{} ({id})", block_label(id)));
                }
                "BlockSet"
            }
            Self::Meta(_) => {
                for id in self.ids() {
                    for meta in 0..META_VALUES as u8 {
                        if self.contains_with_meta(id, meta) {
                            entries.push(format!("{}:{meta} ({id}:{meta})", block_label(id)));
                        }
                    }
                }
                "BlockMetaSet"
            }
        };
        write!(f, "{prefix} [{}]", entries.join(", "))
    }
}

// Printing every word of a 1024-word meta set is useless in test output.
impl fmt::Debug for BlockSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{DIRT, LEAVES_ID, LOG, LOG2, STONE};
    use crate::world::VoxelWorld;
    use lumberjack_prng::GameRng;

    fn random_plain(rng: &mut GameRng) -> BlockSet {
        let ids: Vec<u16> = (0..rng.range_u64(0, 40))
            .map(|_| rng.range_u64(0, MAX_BLOCK_IDS as u64) as u16)
            .collect();
        BlockSet::new(&ids)
    }

    fn random_meta(rng: &mut GameRng) -> BlockSet {
        let entries: Vec<(u16, u8)> = (0..rng.range_u64(0, 40))
            .map(|_| {
                (
                    rng.range_u64(0, 300) as u16,
                    rng.range_u64(0, META_VALUES as u64) as u8,
                )
            })
            .collect();
        BlockSet::with_meta(&entries)
    }

    #[test]
    fn contains_only_listed_ids() {
        let set = BlockSet::new(&[LOG, LEAVES_ID]);
        assert!(set.contains(LOG));
        assert!(set.contains(LEAVES_ID));
        assert!(!set.contains(STONE));
        assert!(!set.contains(0));
        assert!(!set.contains(5000));
    }

    #[test]
    fn plain_set_ignores_meta() {
        let set = BlockSet::new(&[LOG]);
        for meta in 0..16 {
            assert!(set.contains_encoded(BlockState::new(LOG, meta)));
        }
        assert!(!set.contains_encoded(BlockState::new(LOG2, 0)));
    }

    #[test]
    fn meta_set_distinguishes_meta() {
        let set = BlockSet::with_meta(&[(LOG, 1), (LOG, 5)]);
        assert!(set.contains_encoded(BlockState::new(LOG, 1)));
        assert!(set.contains_encoded(BlockState::new(LOG, 5)));
        assert!(!set.contains_encoded(BlockState::new(LOG, 0)));
        assert!(!set.contains_encoded(BlockState::new(LOG, 2)));
        // Id-level query answers "any meta".
        assert!(set.contains(LOG));
        assert!(!set.contains(LEAVES_ID));
    }

    #[test]
    fn highest_id_is_usable() {
        let set = BlockSet::new(&[4095]);
        assert!(set.contains(4095));
        let meta = BlockSet::with_meta(&[(4095, 15)]);
        assert!(meta.contains_encoded(BlockState(u16::MAX)));
    }

    #[test]
    #[should_panic(expected = "outside the id space")]
    fn out_of_range_id_panics() {
        BlockSet::new(&[LOG, 4096]);
    }

    #[test]
    fn try_new_reports_out_of_range() {
        assert_eq!(
            BlockSet::try_new(&[5000]),
            Err(BlockSetError::IdOutOfRange { id: 5000, max: 4096 })
        );
        assert_eq!(
            BlockSet::try_with_meta(&[(LOG, 16)]),
            Err(BlockSetError::MetaOutOfRange { id: 17, meta: 16 })
        );
    }

    #[test]
    fn union_is_commutative() {
        let mut rng = GameRng::new(1);
        for _ in 0..50 {
            let a = random_plain(&mut rng);
            let b = random_plain(&mut rng);
            assert_eq!(a.union(&b), b.union(&a));
            let c = random_meta(&mut rng);
            let d = random_meta(&mut rng);
            assert_eq!(c.union(&d), d.union(&c));
        }
    }

    #[test]
    fn intersect_with_self_is_identity() {
        let mut rng = GameRng::new(2);
        for _ in 0..50 {
            let a = random_plain(&mut rng);
            assert_eq!(a.intersect(&a), a);
            let m = random_meta(&mut rng);
            assert_eq!(m.intersect(&m), m);
        }
    }

    #[test]
    fn double_invert_is_identity() {
        let mut rng = GameRng::new(3);
        for _ in 0..50 {
            let a = random_plain(&mut rng);
            assert_eq!(a.invert().invert(), a);
            let m = random_meta(&mut rng);
            assert_eq!(m.invert().invert(), m);
        }
    }

    #[test]
    fn union_with_complement_is_everything() {
        let mut rng = GameRng::new(4);
        let a = random_plain(&mut rng);
        let all = a.union(&a.invert());
        assert_eq!(all.ids().count(), MAX_BLOCK_IDS);
        assert_eq!(all, BlockSet::empty().invert());

        let m = random_meta(&mut rng);
        let all_meta = m.union(&m.invert());
        for id in [0, LOG, 4095] {
            for meta in 0..16 {
                assert!(all_meta.contains_with_meta(id, meta));
            }
        }
    }

    #[test]
    fn intersect_with_complement_is_empty() {
        let a = BlockSet::new(&[STONE, DIRT, LOG]);
        assert!(a.intersect(&a.invert()).is_empty());
        assert!(!a.is_empty());
    }

    #[test]
    fn plain_union_meta_promotes_every_meta() {
        let plain = BlockSet::new(&[STONE]);
        let meta = BlockSet::with_meta(&[(LOG, 3)]);
        let both = plain.union(&meta);
        assert!(both.is_meta());
        for m in 0..16 {
            assert!(both.contains_with_meta(STONE, m), "stone:{m} missing");
        }
        assert!(both.contains_with_meta(LOG, 3));
        assert!(!both.contains_with_meta(LOG, 2));
        // Order of operands does not matter.
        assert_eq!(both, meta.union(&plain));
    }

    #[test]
    fn plain_intersect_meta_keeps_only_listed_metas() {
        let logs = BlockSet::new(&[LOG, LOG2]);
        let oak_and_dirt = BlockSet::with_meta(&[(LOG, 0), (LOG, 4), (DIRT, 0)]);
        let oak = logs.intersect(&oak_and_dirt);
        assert!(oak.is_meta());
        assert_eq!(oak, BlockSet::with_meta(&[(LOG, 0), (LOG, 4)]));
    }

    #[test]
    fn promotion_preserves_membership() {
        let mut rng = GameRng::new(5);
        for _ in 0..20 {
            let plain = random_plain(&mut rng);
            let promoted = plain.to_meta();
            assert!(promoted.is_meta());
            for id in plain.ids() {
                for meta in 0..16 {
                    assert!(promoted.contains_with_meta(id, meta));
                }
            }
            assert_eq!(promoted.ids().collect::<Vec<_>>(), plain.ids().collect::<Vec<_>>());
        }
    }

    #[test]
    fn plain_and_meta_are_never_equal() {
        let plain = BlockSet::new(&[LOG]);
        assert_ne!(plain, plain.to_meta());
        assert_eq!(plain.to_meta(), plain.to_meta().to_meta());
    }

    #[test]
    fn invert_keeps_resolution() {
        assert!(!BlockSet::new(&[LOG]).invert().is_meta());
        assert!(BlockSet::with_meta(&[(LOG, 0)]).invert().is_meta());
    }

    #[test]
    fn equal_sets_hash_equal() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let hash = |s: &BlockSet| {
            let mut h = DefaultHasher::new();
            s.hash(&mut h);
            h.finish()
        };
        let a = BlockSet::new(&[LOG, LEAVES_ID]);
        let b = BlockSet::new(&[LEAVES_ID]).union(&BlockSet::new(&[LOG]));
        assert_eq!(a, b);
        assert_eq!(hash(&a), hash(&b));
    }

    #[test]
    fn display_lists_contained_blocks() {
        let set = BlockSet::new(&[LEAVES_ID, LOG]);
        assert_eq!(set.to_string(), "BlockSet [Log (17), Leaves (18)]");
        let meta = BlockSet::with_meta(&[(LOG, 2), (3000, 1)]);
        assert_eq!(
            meta.to_string(),
            "BlockMetaSet [Log:2 (17:2), #3000:1 (3000:1)]"
        );
        assert_eq!(BlockSet::empty().to_string(), "BlockSet []");
    }

    #[test]
    fn is_at_and_count_in_read_the_world() {
        let mut world = VoxelWorld::new(8, 8, 8);
        world.set(VoxelCoord::new(1, 1, 1), BlockState::new(LOG, 2));
        world.set(VoxelCoord::new(2, 1, 1), BlockState::new(LOG, 0));
        let logs = BlockSet::new(&[LOG]);
        let birch = BlockSet::with_meta(&[(LOG, 2)]);

        assert!(logs.is_at(&world, VoxelCoord::new(1, 1, 1)));
        assert!(birch.is_at(&world, VoxelCoord::new(1, 1, 1)));
        assert!(!birch.is_at(&world, VoxelCoord::new(2, 1, 1)));
        assert!(!logs.is_at(&world, VoxelCoord::new(-3, 1, 1)));

        let low = VoxelCoord::new(0, 0, 0);
        let high = VoxelCoord::new(3, 3, 3);
        assert_eq!(logs.count_in(&world, low, high), 2);
        assert_eq!(birch.count_in(&world, high, low), 1);
    }
}
