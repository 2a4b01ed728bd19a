//! Sleep Action
//!
//! Villagers sleep through the night unless they are fighting or following a
//! player. Damage wakes them and keeps them awake for a cooldown.

use serde::{Deserialize, Serialize};
use villager_events::{EventKind, MovementState};

use super::ActionContext;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SleepAction {
    is_sleeping: bool,
    sleeping_skin: bool,
    ticks_asleep: u64,
    wake_cooldown: u32,
}

impl SleepAction {
    pub fn is_sleeping(&self) -> bool {
        self.is_sleeping
    }

    /// Whether the sleeping skin is showing
    pub fn sleeping_skin(&self) -> bool {
        self.sleeping_skin
    }

    pub fn ticks_asleep(&self) -> u64 {
        self.ticks_asleep
    }

    pub fn wake_cooldown(&self) -> u32 {
        self.wake_cooldown
    }

    pub fn transition_skin_state(&mut self, sleeping: bool) {
        self.sleeping_skin = sleeping;
    }

    pub fn fall_asleep(&mut self) {
        self.is_sleeping = true;
        self.transition_skin_state(true);
    }

    pub fn wake(&mut self) {
        self.is_sleeping = false;
        self.ticks_asleep = 0;
        self.transition_skin_state(false);
    }

    pub fn tick(&mut self, ctx: &mut ActionContext) {
        self.wake_cooldown = self.wake_cooldown.saturating_sub(1);

        if self.is_sleeping {
            if ctx.is_night {
                self.ticks_asleep += 1;
            } else {
                self.wake();
                ctx.events.push(EventKind::WokeUp);
            }
            return;
        }

        let may_sleep = ctx.is_night
            && self.wake_cooldown == 0
            && ctx.attributes.attack_target().is_none()
            && ctx.attributes.movement_state != MovementState::Follow;
        if may_sleep {
            self.fall_asleep();
            ctx.events.push(EventKind::FellAsleep);
        }
    }

    /// Wake up because we were hurt. Returns true if we were asleep.
    pub fn on_damage(&mut self, wake_cooldown: u32) -> bool {
        self.wake_cooldown = wake_cooldown;
        if self.is_sleeping {
            self.wake();
            true
        } else {
            false
        }
    }
}
