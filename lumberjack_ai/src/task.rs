// Tasks: the planner's output.
//
// The planner never acts on the world. It appends `Task`s to a `TaskQueue`
// owned by the host, and a separate runner drains the queue later, one task
// at a time. Tasks are plain data (serializable, comparable) so a plan can be
// inspected, logged as JSON, or asserted on in tests.
//
// `SwitchLargeTree` is the only task that calls back into the planner: when
// the runner reaches it, it must hand the carried state to
// `HarvestPlanner::apply_mode_switch`, which re-validates the agent's
// position before entering or leaving large-tree mode.
//
// See also: `planner.rs` and `large_tree.rs` which emit tasks,
// `harvest_tests` for a runner that executes them against a `VoxelWorld`.

use crate::blocks::WoodType;
use crate::large_tree::LargeTreeState;
use crate::types::VoxelCoord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of a plan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Task {
    /// Walk horizontally into `to`, breaking whatever is in the way.
    MoveTo { to: VoxelCoord },
    /// Jump up into `to` from the column at (`from_x`, `from_z`) one level
    /// below, breaking whatever is in the way.
    JumpMoveTo {
        to: VoxelCoord,
        from_x: i32,
        from_z: i32,
    },
    /// Break every block in the inclusive box `low..=high`.
    DestroyInRange { low: VoxelCoord, high: VoxelCoord },
    /// Place a sapling of the given species at `at`.
    PlantSapling { at: VoxelCoord, wood: Option<WoodType> },
    /// Do nothing for a number of ticks.
    Wait { ticks: u32 },
    /// Enter large-tree mode with `Some(state)`, or leave it with `None`.
    SwitchLargeTree { state: Option<LargeTreeState> },
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Task::MoveTo { to } => write!(f, "move to {to}"),
            Task::JumpMoveTo { to, from_x, from_z } => {
                write!(f, "jump to {to} from ({from_x}, {from_z})")
            }
            Task::DestroyInRange { low, high } => write!(f, "destroy {low}..={high}"),
            Task::PlantSapling { at, wood } => match wood {
                Some(wood) => write!(f, "plant {wood:?} sapling at {at}"),
                None => write!(f, "plant sapling at {at}"),
            },
            Task::Wait { ticks } => write!(f, "wait {ticks} ticks"),
            Task::SwitchLargeTree { state: Some(state) } => {
                write!(f, "enter large tree {state}")
            }
            Task::SwitchLargeTree { state: None } => write!(f, "leave large tree"),
        }
    }
}

/// Ordered, append-only (from the planner's side) list of pending tasks.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TaskQueue {
    tasks: Vec<Task>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, task: Task) {
        log::trace!("queued: {task}");
        self.tasks.push(task);
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    /// Remove and return every queued task, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = Task> + '_ {
        self.tasks.drain(..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_preserves_order() {
        let mut queue = TaskQueue::new();
        assert!(queue.is_empty());
        queue.push(Task::Wait { ticks: 4 });
        queue.push(Task::MoveTo {
            to: VoxelCoord::new(1, 2, 3),
        });
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.as_slice()[0], Task::Wait { ticks: 4 });

        let drained: Vec<Task> = queue.drain().collect();
        assert_eq!(drained.len(), 2);
        assert!(matches!(drained[1], Task::MoveTo { .. }));
        assert!(queue.is_empty());
    }

    #[test]
    fn task_display() {
        let destroy = Task::DestroyInRange {
            low: VoxelCoord::new(0, 2, 0),
            high: VoxelCoord::new(0, 5, 0),
        };
        assert_eq!(destroy.to_string(), "destroy (0, 2, 0)..=(0, 5, 0)");
        assert_eq!(
            Task::SwitchLargeTree { state: None }.to_string(),
            "leave large tree"
        );
        let plant = Task::PlantSapling {
            at: VoxelCoord::new(1, 1, 1),
            wood: Some(WoodType::Birch),
        };
        assert_eq!(plant.to_string(), "plant Birch sapling at (1, 1, 1)");
    }

    #[test]
    fn queue_serialization_roundtrip() {
        let mut queue = TaskQueue::new();
        queue.push(Task::JumpMoveTo {
            to: VoxelCoord::new(5, 6, 7),
            from_x: 4,
            from_z: 7,
        });
        queue.push(Task::PlantSapling {
            at: VoxelCoord::new(5, 5, 7),
            wood: None,
        });
        let json = serde_json::to_string(&queue).unwrap();
        let restored: TaskQueue = serde_json::from_str(&json).unwrap();
        assert_eq!(queue.as_slice(), restored.as_slice());
    }
}
