// Error types for the classifier and planner.
//
// `BlockSetError` reports an invalid block id or meta handed to one of the
// fallible `BlockSet` constructors (the panicking constructors treat the same
// input as a programming error). `ConfigError` rejects a harvest config that
// does not parse or whose score weights could drive a destination score to
// zero or below. `TaskError` is the planner's failure signal: it is raised
// when a large-tree plan finds the agent somewhere other than where the plan
// expects, and carries the offending position so the host can report it.
//
// See also: `block_set.rs`, `config.rs`, `large_tree.rs`, `planner.rs`.

use crate::types::VoxelCoord;
use thiserror::Error;

/// Invalid input to a `BlockSet` constructor.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BlockSetError {
    #[error("block id {id} is outside the id space (max {max})")]
    IdOutOfRange { id: u32, max: u32 },

    #[error("meta value {meta} for block id {id} is outside 0..16")]
    MetaOutOfRange { id: u32, meta: u32 },
}

/// A harvest config that cannot be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The trunk bonus can outweigh the base score, which would make a tall
    /// trunk read the same as (or lower than) a rejection.
    #[error(
        "score_base {score_base} must exceed tree_scan_height {tree_scan_height} \
         times score_per_trunk_block {score_per_trunk_block}"
    )]
    ScoreWeights {
        score_base: f32,
        score_per_trunk_block: f32,
        tree_scan_height: i32,
    },
}

/// A plan precondition that no longer holds at execution time.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TaskError {
    /// The agent is not where the plan needs it to be.
    #[error("desync at {pos}: {message}")]
    Desync { message: String, pos: VoxelCoord },
}

impl TaskError {
    pub fn desync(message: impl Into<String>, pos: VoxelCoord) -> Self {
        Self::Desync {
            message: message.into(),
            pos,
        }
    }

    /// The position the failure refers to.
    pub fn pos(&self) -> VoxelCoord {
        match self {
            Self::Desync { pos, .. } => *pos,
        }
    }
}
