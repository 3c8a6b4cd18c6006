// The harvest planner: the single entry point the host's movement engine
// talks to.
//
// The engine runs its own path search and uses the planner three ways:
//
// 1. Before searching, it calls `add_tasks_for_large_tree`. If a large tree
//    is being harvested the planner queues the whole staircase plan and the
//    engine skips the search for this round.
// 2. During the search, it calls `rate_destination` for every candidate
//    column (see `scoring.rs`).
// 3. When the agent has walked to the chosen column, it calls
//    `add_tasks_for_target`, which either queues a switch into large-tree
//    mode or the plan for felling a single trunk.
//
// ## Modes
//
// The planner is either `Searching` or `LargeTreeActive`, represented by the
// `Option<LargeTreeState>` it owns. The planner itself never changes mode
// while planning; it only queues `Task::SwitchLargeTree`. The runner executes
// that task later, in order, by calling `apply_mode_switch`, which re-checks
// the agent's position so a plan that went stale in the meantime (the agent
// was pushed, a block changed) cannot enter large-tree mode in the wrong
// place. A desync while emitting a large-tree plan also drops back to
// `Searching`.
//
// See also: `large_tree.rs` for detection and the staircase plan,
// `scoring.rs` for destination rating, `config.rs` for every tunable used
// here, `task.rs` for the emitted tasks.

use crate::block_set::BlockSet;
use crate::blocks::{AIR, LEAVES, Safety, TREE_STUFF};
use crate::config::HarvestConfig;
use crate::error::TaskError;
use crate::large_tree::LargeTreeState;
use crate::scoring;
use crate::task::{Task, TaskQueue};
use crate::types::VoxelCoord;
use crate::world::WorldAccessor;

/// Which of the two planning modes the planner is in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlannerMode {
    Searching,
    LargeTreeActive,
}

/// Plans tree harvesting for one agent.
#[derive(Clone, Debug)]
pub struct HarvestPlanner {
    config: HarvestConfig,
    /// Blocks that count as trunk, derived from `config.wood`.
    trunk: BlockSet,
    safety: Safety,
    large_tree: Option<LargeTreeState>,
}

impl HarvestPlanner {
    pub fn new(config: HarvestConfig) -> Self {
        Self::with_safety(config, Safety::default())
    }

    /// A planner using custom safety rules.
    pub fn with_safety(config: HarvestConfig, safety: Safety) -> Self {
        if let Err(e) = config.validate() {
            log::warn!("planner built from unchecked config: {e}");
        }
        let trunk = config.trunk_blocks();
        Self {
            config,
            trunk,
            safety,
            large_tree: None,
        }
    }

    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    pub fn trunk_blocks(&self) -> &BlockSet {
        &self.trunk
    }

    pub fn safety(&self) -> &Safety {
        &self.safety
    }

    pub fn mode(&self) -> PlannerMode {
        match self.large_tree {
            Some(_) => PlannerMode::LargeTreeActive,
            None => PlannerMode::Searching,
        }
    }

    pub fn large_tree(&self) -> Option<&LargeTreeState> {
        self.large_tree.as_ref()
    }

    /// Blocks the movement engine may break when they block the agent's
    /// feet or head: the trunk being harvested and any leaves.
    pub fn clearable_blocks(&self) -> BlockSet {
        match self.config.wood {
            None => (*TREE_STUFF).clone(),
            Some(_) => self.trunk.union(&LEAVES),
        }
    }

    /// Rate a candidate destination. Lower is better; negative rejects.
    pub fn rate_destination<W: WorldAccessor + ?Sized>(
        &self,
        world: &W,
        distance: u32,
        pos: VoxelCoord,
    ) -> f32 {
        scoring::rate_destination(world, &self.trunk, &self.safety, &self.config, distance, pos)
    }

    /// Queue the large-tree plan if a large tree is active.
    ///
    /// Returns `Ok(true)` when tasks were queued (the caller should skip its
    /// path search), `Ok(false)` in `Searching` mode. A desync clears the
    /// large-tree state and is returned to the caller.
    pub fn add_tasks_for_large_tree<W: WorldAccessor + ?Sized>(
        &mut self,
        world: &W,
        agent: VoxelCoord,
        queue: &mut TaskQueue,
    ) -> Result<bool, TaskError> {
        let Some(state) = self.large_tree else {
            return Ok(false);
        };
        if let Err(e) = state.add_tasks(
            world,
            &self.safety,
            self.config.stair_clear_height,
            agent,
            queue,
        ) {
            log::warn!("dropping large tree after desync: {e}");
            self.large_tree = None;
            return Err(e);
        }
        queue.push(Task::SwitchLargeTree { state: None });
        Ok(true)
    }

    /// Queue the work for an agent that has arrived at a trunk base.
    pub fn add_tasks_for_target<W: WorldAccessor + ?Sized>(
        &self,
        world: &W,
        arrival: VoxelCoord,
        queue: &mut TaskQueue,
    ) {
        if let Some(state) = LargeTreeState::detect(world, &self.trunk, &self.config, arrival) {
            queue.push(Task::SwitchLargeTree { state: Some(state) });
            return;
        }

        let scan_height = self.config.tree_scan_height;
        let mine_above = (2..scan_height)
            .filter(|&i| self.trunk.is_at(world, arrival.up(i)))
            .max()
            .unwrap_or(0);

        let mut max = 0;
        for i in 2..=mine_above {
            let level = arrival.up(i);
            if !self.safety.safe_side_and_ceiling_around(world, level) {
                log::debug!("trunk above {level} is unsafe to reach");
                break;
            }
            if !AIR.is_at(world, level) {
                max = i;
            }
        }
        if max > 0 {
            queue.push(Task::DestroyInRange {
                low: arrival.up(2),
                high: arrival.up(max),
            });
        }

        if self.config.replant {
            queue.push(Task::PlantSapling {
                at: arrival,
                wood: self.config.wood,
            });
        }
        queue.push(Task::Wait {
            ticks: mine_above as u32 * self.config.wait_ticks_per_level,
        });
    }

    /// Execute a queued `SwitchLargeTree`.
    ///
    /// Entering is refused (the planner stays in `Searching`) if the agent is
    /// no longer on the target's staircase. Leaving always succeeds.
    pub fn apply_mode_switch(
        &mut self,
        target: Option<LargeTreeState>,
        agent: VoxelCoord,
    ) -> Result<(), TaskError> {
        match target {
            Some(state) if !state.is_valid_player_position(agent) => {
                log::warn!("refusing large tree at {agent}: {state}");
                self.large_tree = None;
                Err(TaskError::desync("Not in a tree.", agent))
            }
            Some(state) => {
                log::info!("entering large tree mode: {state}");
                self.large_tree = Some(state);
                Ok(())
            }
            None => {
                if self.large_tree.take().is_some() {
                    log::info!("leaving large tree mode at {agent}");
                }
                Ok(())
            }
        }
    }
}
