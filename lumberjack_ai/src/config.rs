// Data-driven harvest configuration.
//
// Every tunable the planner reads lives in `HarvestConfig`, loaded from JSON
// at construction time. Planning code never hard-codes scan heights, score
// weights or wait durations; it reads them from here. Fields missing from the
// JSON fall back to the defaults below, so a config file only needs to name
// what it changes (`{"wood": "Birch", "replant": false}` is a complete
// config).
//
// The score weights must keep every accepted destination strictly positive:
// `score_base` has to exceed the largest possible trunk bonus,
// `tree_scan_height * score_per_trunk_block`. `from_json` refuses configs
// that break this, so a parsed config always ranks taller trunks strictly
// lower at equal distance.
//
// See also: `planner.rs` which owns a `HarvestConfig`, `blocks.rs` for
// `WoodType`.

use crate::block_set::BlockSet;
use crate::blocks::{LOGS, WoodType};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Harvest planner settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    /// Restrict harvesting to one species. `None` harvests any log.
    pub wood: Option<WoodType>,

    /// Plant a sapling at the base after felling a single-trunk tree.
    pub replant: bool,

    /// Levels above the standing position (exclusive) inspected when scoring
    /// a destination and when felling a single trunk.
    pub tree_scan_height: i32,

    /// A 2×2 trunk counts as a large tree only if it is taller than this.
    pub large_tree_min_height: i32,

    /// Levels above each staircase step cleared on the way down.
    pub stair_clear_height: i32,

    /// Upper bound for the large-tree height scan.
    pub max_scan_y: i32,

    /// Constant added to the path distance when rating a destination.
    pub score_base: f32,

    /// Score bonus (subtracted) per trunk block found above a destination.
    pub score_per_trunk_block: f32,

    /// Ticks to wait per level of trunk removed, letting drops settle.
    pub wait_ticks_per_level: u32,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            wood: None,
            replant: true,
            tree_scan_height: 7,
            large_tree_min_height: 3,
            stair_clear_height: 4,
            max_scan_y: 255,
            score_base: 20.0,
            score_per_trunk_block: 2.0,
            wait_ticks_per_level: 2,
        }
    }
}

impl HarvestConfig {
    /// Parse and validate a config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that no accepted destination can score zero or below.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let max_bonus = self.tree_scan_height as f32 * self.score_per_trunk_block;
        if self.score_base <= max_bonus {
            return Err(ConfigError::ScoreWeights {
                score_base: self.score_base,
                score_per_trunk_block: self.score_per_trunk_block,
                tree_scan_height: self.tree_scan_height,
            });
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// The blocks treated as trunk: one species' logs, or every log.
    pub fn trunk_blocks(&self) -> BlockSet {
        match self.wood {
            Some(wood) => wood.log_blocks(),
            None => (*LOGS).clone(),
        }
    }
}
