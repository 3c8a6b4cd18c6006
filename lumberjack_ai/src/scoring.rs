// Destination scoring for the tree search.
//
// The external path search asks the planner to rate every reachable column
// it considers as a destination. A destination is the column the agent will
// stand in at the base of a trunk, so the trunk block at the standing
// position and the one above it are broken on arrival.
//
// Lower scores are better. The score starts at `distance + score_base` and
// drops by `score_per_trunk_block` for each trunk block found in the
// vertical scan, so closer trees and taller exposed trunks win. The scan
// above the first two levels stops at the first level whose surroundings are
// unsafe: trunk the agent could not safely reach does not make a destination
// more attractive.
//
// A destination without trunk at either of its two lowest levels is not a
// tree base at all and gets the `REJECTED` sentinel. At most
// `tree_scan_height` points can be earned, and `HarvestConfig::validate`
// keeps `score_base` above that bonus, so accepted scores stay positive.
//
// See also: `planner.rs` which exposes this to the search engine,
// `blocks.rs` for the `Safety` predicates.

use crate::block_set::BlockSet;
use crate::blocks::Safety;
use crate::config::HarvestConfig;
use crate::types::VoxelCoord;
use crate::world::WorldAccessor;

/// Score meaning "do not go here". Any negative score rejects.
pub const REJECTED: f32 = -1.0;

/// Rate standing at `pos`, `distance` steps away from the agent.
pub fn rate_destination<W: WorldAccessor + ?Sized>(
    world: &W,
    trunk: &BlockSet,
    safety: &Safety,
    config: &HarvestConfig,
    distance: u32,
    pos: VoxelCoord,
) -> f32 {
    let at_feet = trunk.is_at(world, pos);
    let at_head = trunk.is_at(world, pos.up(1));
    if !at_feet && !at_head {
        return REJECTED;
    }

    let mut points = u32::from(at_feet) + u32::from(at_head);
    for i in 2..config.tree_scan_height {
        let level = pos.up(i);
        if !safety.safe_side_and_ceiling_around(world, level) {
            break;
        }
        if trunk.is_at(world, level) {
            points += 1;
        }
    }

    distance as f32 + config.score_base - points as f32 * config.score_per_trunk_block
}
