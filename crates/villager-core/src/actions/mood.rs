//! Mood Action
//!
//! A bounded mood level that drifts back toward neutral over time.

use serde::{Deserialize, Serialize};
use villager_events::EventKind;

use super::{ActionContext, ActionHook};
use crate::config::Config;

/// Coarse mood bucket used in speech and display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoodLabel {
    Depressed,
    Sad,
    Neutral,
    Happy,
    Elated,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoodAction {
    mood_level: f32,
    ticks_since_drift: u64,
}

impl MoodAction {
    pub fn mood_level(&self) -> f32 {
        self.mood_level
    }

    /// Apply a delta, clamped to `[-max_level, max_level]`. Returns the new level.
    pub fn modify_mood_level(&mut self, delta: f32, max_level: f32) -> f32 {
        self.mood_level = (self.mood_level + delta).clamp(-max_level, max_level);
        self.mood_level
    }

    pub fn mood_label(&self) -> MoodLabel {
        match self.mood_level {
            l if l <= -10.0 => MoodLabel::Depressed,
            l if l <= -3.0 => MoodLabel::Sad,
            l if l < 3.0 => MoodLabel::Neutral,
            l if l < 10.0 => MoodLabel::Happy,
            _ => MoodLabel::Elated,
        }
    }

    pub fn tick(&mut self, ctx: &mut ActionContext) {
        let mood = &ctx.config.mood;
        self.ticks_since_drift += 1;
        if self.ticks_since_drift < mood.drift_interval || self.mood_level == 0.0 {
            return;
        }
        self.ticks_since_drift = 0;

        let step = mood.drift_step.min(self.mood_level.abs());
        let delta = -step * self.mood_level.signum();
        let level = self.modify_mood_level(delta, mood.max_level);
        ctx.events.push(EventKind::MoodChanged { delta, level });
    }

    pub fn on_hook(&mut self, hook: ActionHook, config: &Config) {
        let delta = match hook {
            ActionHook::MarriedToVillager | ActionHook::MarriedToPlayer => {
                config.mood.marriage_bonus
            }
            ActionHook::MarriageEnded => config.mood.marriage_end_penalty,
            ActionHook::Say => return,
        };
        self.modify_mood_level(delta, config.mood.max_level);
    }
}
