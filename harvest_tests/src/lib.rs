// Test-only host for end-to-end harvest tests.
//
// Plays the part of the movement engine and task executor around a real
// `HarvestPlanner`, against a real `VoxelWorld`:
// search → walk to destination → plan → execute tasks → search again.
//
// The search is a brute-force scan of every standing position in the world,
// rated with `HarvestPlanner::rate_destination`, and "walking" teleports the
// agent (breaking the two blocks it arrives in, as the real engine does at a
// trunk base). Task execution is strict: a move that does not start from
// where the task says panics, so a malformed plan fails the test loudly.
//
// See also: `tests/full_pipeline.rs` for the scenarios.

use lumberjack_ai::blocks::{LOGS, SAFE_GROUND, WoodType};
use lumberjack_ai::config::HarvestConfig;
use lumberjack_ai::error::TaskError;
use lumberjack_ai::planner::HarvestPlanner;
use lumberjack_ai::task::{Task, TaskQueue};
use lumberjack_ai::types::{BlockState, VoxelCoord};
use lumberjack_ai::world::VoxelWorld;

/// Install a test logger. Quiet unless `RUST_LOG` is set.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .is_test(true)
        .try_init();
}

/// What one host cycle did.
#[derive(Clone, Debug, PartialEq)]
pub enum StepOutcome {
    /// A large tree was active and its staircase plan ran.
    LargeTree,
    /// The agent walked to a destination with the given score and ran the
    /// arrival plan.
    Target { pos: VoxelCoord, score: f32 },
    /// Nothing left worth walking to.
    Idle,
}

/// A host driving one planner and one agent.
pub struct TestRunner {
    pub world: VoxelWorld,
    pub planner: HarvestPlanner,
    pub agent: VoxelCoord,
    pub queue: TaskQueue,
    /// Every task executed so far, in order.
    pub executed: Vec<Task>,
    /// Errors reported by `SwitchLargeTree` tasks.
    pub desyncs: Vec<TaskError>,
    /// Trunk blocks broken so far.
    pub harvested: usize,
    /// Simulated time: one tick per task plus waits.
    pub ticks: u64,
}

impl TestRunner {
    pub fn new(world: VoxelWorld, config: HarvestConfig, agent: VoxelCoord) -> Self {
        init_logging();
        Self {
            world,
            planner: HarvestPlanner::new(config),
            agent,
            queue: TaskQueue::new(),
            executed: Vec::new(),
            desyncs: Vec::new(),
            harvested: 0,
            ticks: 0,
        }
    }

    /// Trunk blocks left anywhere in the world.
    pub fn trunk_remaining(&self) -> usize {
        let high = VoxelCoord::new(
            self.world.size_x as i32 - 1,
            self.world.size_y as i32 - 1,
            self.world.size_z as i32 - 1,
        );
        LOGS.count_in(&self.world, VoxelCoord::new(0, 0, 0), high)
    }

    /// Best-rated standing position, ties going to the first found.
    pub fn find_destination(&self) -> Option<(VoxelCoord, f32)> {
        let mut best: Option<(VoxelCoord, f32)> = None;
        for y in 1..self.world.size_y as i32 {
            for z in 0..self.world.size_z as i32 {
                for x in 0..self.world.size_x as i32 {
                    let pos = VoxelCoord::new(x, y, z);
                    if !SAFE_GROUND.is_at(&self.world, pos.up(-1)) {
                        continue;
                    }
                    let distance = self.agent.manhattan_distance(pos);
                    let score = self.planner.rate_destination(&self.world, distance, pos);
                    if score < 0.0 {
                        continue;
                    }
                    if best.is_none_or(|(_, s)| score < s) {
                        best = Some((pos, score));
                    }
                }
            }
        }
        best
    }

    /// One host cycle.
    pub fn step(&mut self) -> StepOutcome {
        match self
            .planner
            .add_tasks_for_large_tree(&self.world, self.agent, &mut self.queue)
        {
            Ok(true) => {
                self.run_queue();
                return StepOutcome::LargeTree;
            }
            Ok(false) => {}
            Err(e) => {
                log::warn!("large tree plan failed: {e}");
                self.desyncs.push(e);
            }
        }

        let Some((pos, score)) = self.find_destination() else {
            return StepOutcome::Idle;
        };
        self.walk_to(pos);
        self.planner
            .add_tasks_for_target(&self.world, self.agent, &mut self.queue);
        self.run_queue();
        StepOutcome::Target { pos, score }
    }

    /// Run host cycles until idle. Returns the outcomes; panics if the
    /// world is still not harvested after `max_steps`.
    pub fn run_until_idle(&mut self, max_steps: usize) -> Vec<StepOutcome> {
        let mut outcomes = Vec::new();
        for _ in 0..max_steps {
            let outcome = self.step();
            let idle = outcome == StepOutcome::Idle;
            outcomes.push(outcome);
            if idle {
                return outcomes;
            }
        }
        panic!("still busy after {max_steps} steps: {outcomes:?}");
    }

    /// Execute every queued task in order.
    pub fn run_queue(&mut self) {
        let tasks: Vec<Task> = self.queue.drain().collect();
        let mut tasks = tasks.into_iter();
        while let Some(task) = tasks.next() {
            self.ticks += 1;
            log::debug!("executing: {task}");
            if let Err(e) = self.execute(&task) {
                // A desync abandons the rest of the plan.
                log::warn!("desync, dropping {} tasks: {e}", tasks.len());
                self.desyncs.push(e);
                self.executed.push(task);
                return;
            }
            self.executed.push(task);
        }
    }

    fn execute(&mut self, task: &Task) -> Result<(), TaskError> {
        match task {
            Task::MoveTo { to } => {
                let (dx, dz) = (to.x - self.agent.x, to.z - self.agent.z);
                assert!(
                    dx.abs() + dz.abs() <= 1 && to.y <= self.agent.y,
                    "illegal move from {} to {to}",
                    self.agent
                );
                self.enter(*to);
                self.fall();
            }
            Task::JumpMoveTo { to, from_x, from_z } => {
                assert_eq!(
                    (self.agent.x, self.agent.z),
                    (*from_x, *from_z),
                    "jump to {to} does not start at the agent"
                );
                assert_eq!(to.y, self.agent.y + 1, "jump to {to} is not one level up");
                assert_eq!(
                    (to.x - from_x).abs() + (to.z - from_z).abs(),
                    1,
                    "jump to {to} is not to a neighbouring column"
                );
                // Headroom for the jump.
                self.break_block(self.agent.up(2));
                self.enter(*to);
            }
            Task::DestroyInRange { low, high } => {
                for y in low.y..=high.y {
                    for z in low.z..=high.z {
                        for x in low.x..=high.x {
                            self.break_block(VoxelCoord::new(x, y, z));
                        }
                    }
                }
                self.fall();
            }
            Task::PlantSapling { at, wood } => {
                let sapling = wood.unwrap_or(WoodType::Oak).sapling_state();
                if self.world.get(*at) == BlockState::AIR {
                    self.world.set(*at, sapling);
                }
            }
            Task::Wait { ticks } => self.ticks += u64::from(*ticks),
            Task::SwitchLargeTree { state } => {
                self.planner.apply_mode_switch(*state, self.agent)?;
            }
        }
        Ok(())
    }

    fn walk_to(&mut self, pos: VoxelCoord) {
        self.enter(pos);
    }

    /// Break the two blocks the agent's body occupies at `pos` and stand
    /// there.
    fn enter(&mut self, pos: VoxelCoord) {
        self.break_block(pos);
        self.break_block(pos.up(1));
        self.agent = pos;
    }

    fn fall(&mut self) {
        while self.agent.y > 0 && self.world.get(self.agent.up(-1)) == BlockState::AIR {
            self.agent = self.agent.up(-1);
        }
    }

    fn break_block(&mut self, pos: VoxelCoord) {
        if LOGS.is_at(&self.world, pos) {
            self.harvested += 1;
        }
        self.world.set(pos, BlockState::AIR);
    }
}
