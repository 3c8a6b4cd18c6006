// Large (2×2) trunk handling: detection, staircase geometry, and the
// climb-then-clear plan.
//
// A large tree has a trunk two columns wide in both horizontal axes. The
// agent cannot reach its top from the ground, so instead it cuts a spiral
// staircase into the trunk itself: one step per level, rotating through the
// four columns of the footprint. After climbing as high as is safe, it walks
// the staircase back down and clears the whole footprint from each step up
// to `stair_clear_height` levels above it.
//
// ## Staircase
//
// With footprint origin (min_x, min_z) and phase `stair_offset` (0..4), the
// step for level `y` is
//
//   x = min_x + (((y + offset)     >> 1) & 1)
//   z = min_z + (((y + offset + 1) >> 1) & 1)
//
// which cycles (0,0) → (0,1) → (1,1) → (1,0) with period 4. Consecutive
// steps are always edge-adjacent, never diagonal. The phase is solved once,
// on detection, so the agent's current column is the step for its level.
//
// ## Detection
//
// Arriving at a trunk base, the agent might be standing in any of the four
// columns of a 2×2 footprint, so the four footprints having the agent's
// column as a corner are tried in a fixed order. For each, the trunk is
// counted slab by slab from the agent's level upward. A slab needs 3 trunk
// blocks up to one level above the agent (the agent already broke the blocks
// it is standing in) and all 4 above that. The first failing level is
// `top_y`; the footprint is a large tree if it is taller than
// `large_tree_min_height`.
//
// See also: `planner.rs` which owns the active `LargeTreeState` and switches
// into and out of large-tree mode, `task.rs` for the emitted tasks.

use crate::block_set::BlockSet;
use crate::blocks::Safety;
use crate::config::HarvestConfig;
use crate::error::TaskError;
use crate::task::{Task, TaskQueue};
use crate::types::VoxelCoord;
use crate::world::WorldAccessor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trunk blocks a slab needs at or below one level above the agent.
const REQUIRED_NEAR_AGENT: usize = 3;
/// Trunk blocks a slab needs above that.
const REQUIRED_ABOVE_AGENT: usize = 4;

/// Planning record for a large tree being harvested.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LargeTreeState {
    min_x: i32,
    min_z: i32,
    /// Level harvesting started at; the descent clears down to here.
    min_y: i32,
    /// First level that is no longer trunk.
    top_y: i32,
    /// Staircase phase, 0..4.
    stair_offset: i32,
}

impl LargeTreeState {
    /// A footprint with its lower corner at `origin`, not yet scanned.
    pub fn at(origin: VoxelCoord) -> Self {
        Self {
            min_x: origin.x,
            min_z: origin.z,
            min_y: origin.y,
            top_y: origin.y,
            stair_offset: 0,
        }
    }

    /// Find the large tree whose footprint has `arrival` as a corner.
    ///
    /// Candidates are tried in order: the footprint extending +x/+z from the
    /// agent, then the ones shifted one column toward -z, -x, and -x-z. The
    /// first one taller than the configured minimum wins. Returns `None` for
    /// an ordinary tree or an already-cleared footprint.
    pub fn detect<W: WorldAccessor + ?Sized>(
        world: &W,
        trunk: &BlockSet,
        config: &HarvestConfig,
        arrival: VoxelCoord,
    ) -> Option<Self> {
        let candidates = [
            arrival,
            arrival.offset(0, 0, -1),
            arrival.offset(-1, 0, 0),
            arrival.offset(-1, 0, -1),
        ];
        for origin in candidates {
            let mut state = Self::at(origin);
            state.scan_tree_height(world, trunk, arrival, config.max_scan_y);
            if state.tree_height() <= config.large_tree_min_height {
                continue;
            }
            match state.set_offset_by_position(arrival) {
                Ok(()) => {
                    log::debug!("large tree detected: {state}");
                    return Some(state);
                }
                Err(e) => log::warn!("footprint at {origin} rejected: {e}"),
            }
        }
        None
    }

    pub fn min_x(&self) -> i32 {
        self.min_x
    }

    pub fn min_z(&self) -> i32 {
        self.min_z
    }

    pub fn min_y(&self) -> i32 {
        self.min_y
    }

    pub fn top_y(&self) -> i32 {
        self.top_y
    }

    pub fn stair_offset(&self) -> i32 {
        self.stair_offset
    }

    pub fn tree_height(&self) -> i32 {
        self.top_y - self.min_y
    }

    /// The staircase step the agent stands in at level `y`.
    pub fn stair_position(&self, y: i32) -> VoxelCoord {
        VoxelCoord::new(self.min_x + self.relative_x(y), y, self.min_z + self.relative_z(y))
    }

    fn relative_x(&self, y: i32) -> i32 {
        ((y + self.stair_offset) >> 1) & 1
    }

    fn relative_z(&self, y: i32) -> i32 {
        ((y + self.stair_offset + 1) >> 1) & 1
    }

    /// Scan upward from `min_y` and set `top_y` to the first level whose
    /// slab holds too little trunk. `agent` is the position the agent was in
    /// when the tree was found; its column is expected to be broken up to
    /// one level above it.
    pub fn scan_tree_height<W: WorldAccessor + ?Sized>(
        &mut self,
        world: &W,
        trunk: &BlockSet,
        agent: VoxelCoord,
        max_scan_y: i32,
    ) {
        self.top_y = self.min_y;
        while self.top_y < max_scan_y {
            let corner = VoxelCoord::new(self.min_x, self.top_y, self.min_z);
            let found = trunk.count_in(world, corner, corner.offset(1, 0, 1));
            let required = if self.top_y <= agent.y + 1 {
                REQUIRED_NEAR_AGENT
            } else {
                REQUIRED_ABOVE_AGENT
            };
            log::debug!(
                "footprint ({}, {}) y={}: {found} trunk blocks, need {required}",
                self.min_x,
                self.min_z,
                self.top_y
            );
            if found < required {
                break;
            }
            self.top_y += 1;
        }
    }

    /// Choose the staircase phase that puts `pos` on the step for its level.
    pub fn set_offset_by_position(&mut self, pos: VoxelCoord) -> Result<(), TaskError> {
        for offset in 0..4 {
            self.stair_offset = offset;
            if self.stair_position(pos.y) == pos {
                return Ok(());
            }
        }
        self.stair_offset = 0;
        Err(TaskError::desync(
            format!("{pos} is not on the trunk"),
            pos,
        ))
    }

    /// Whether `pos` is a staircase step inside the harvested height range.
    pub fn is_valid_player_position(&self, pos: VoxelCoord) -> bool {
        pos.y >= self.min_y && pos.y < self.top_y && self.stair_position(pos.y) == pos
    }

    /// Queue the climb and the clearing descent for an agent at `agent`.
    ///
    /// The climb stops early (without failing) at the first step that is not
    /// safe to stand in. The descent then visits every step from the highest
    /// one reached back down to the agent's level and clears the footprint
    /// above each.
    pub fn add_tasks<W: WorldAccessor + ?Sized>(
        &self,
        world: &W,
        safety: &Safety,
        clear_height: i32,
        agent: VoxelCoord,
        queue: &mut TaskQueue,
    ) -> Result<(), TaskError> {
        if !self.is_valid_player_position(agent) {
            log::warn!("illegal start position {agent} for {self}");
            return Err(TaskError::desync(
                format!("not on the staircase of {self}"),
                agent,
            ));
        }

        let mut last = agent;
        for y in agent.y + 1..self.top_y {
            let step = self.stair_position(y);
            if !safety.safe_side_and_ceiling_around(world, step.up(1))
                || !safety.safe_side_around(world, step)
                || !safety.safe_ground_at(world, step.up(-1))
            {
                log::debug!("climb stops below unsafe step {step}");
                break;
            }
            queue.push(Task::JumpMoveTo {
                to: step,
                from_x: last.x,
                from_z: last.z,
            });
            last = step;
        }

        for y in (agent.y..=last.y).rev() {
            queue.push(Task::MoveTo {
                to: self.stair_position(y),
            });
            queue.push(Task::DestroyInRange {
                low: VoxelCoord::new(self.min_x, y, self.min_z),
                high: VoxelCoord::new(self.min_x + 1, y + clear_height, self.min_z + 1),
            });
        }
        Ok(())
    }
}

impl fmt::Display for LargeTreeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LargeTreeState [min_x={}, min_z={}, min_y={}, top_y={}, stair_offset={}]",
            self.min_x, self.min_z, self.min_y, self.top_y, self.stair_offset
        )
    }
}
