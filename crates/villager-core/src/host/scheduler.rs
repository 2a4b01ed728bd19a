//! Host Task Scheduler
//!
//! Stand-in for the host's AI task runner and path follower. The arbiter
//! drives it once per tick; the scheduler honors `pathing_suspended` by
//! delivering nothing while it is set.

use bevy_ecs::prelude::*;
use std::collections::VecDeque;

use crate::components::Position;

#[derive(Component, Debug, Clone, Default)]
pub struct TaskScheduler {
    /// Set by the arbiter; while true the scheduler must not run
    pub pathing_suspended: bool,
    path: VecDeque<Position>,
    /// Full ticks (tasks plus path following) delivered
    pub ticks_delivered: u64,
    /// Invocations of the per-tick task hook
    pub task_updates: u64,
    pub look_updates: u64,
}

impl TaskScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_path(&mut self, waypoints: impl IntoIterator<Item = Position>) {
        self.path = waypoints.into_iter().collect();
    }

    pub fn clear_path(&mut self) {
        self.path.clear();
    }

    pub fn has_path(&self) -> bool {
        !self.path.is_empty()
    }

    /// Run tasks and advance one waypoint along the current path
    pub fn run_full_tick(&mut self, position: &mut Position) {
        if self.pathing_suspended {
            return;
        }
        self.ticks_delivered += 1;
        self.task_updates += 1;
        if let Some(next) = self.path.pop_front() {
            *position = next;
        }
    }

    /// Run only the task hook and look helper, without moving
    pub fn run_task_hook(&mut self) {
        if self.pathing_suspended {
            return;
        }
        self.task_updates += 1;
        self.look_updates += 1;
    }
}
