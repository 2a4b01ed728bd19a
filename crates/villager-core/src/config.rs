//! Configuration System
//!
//! Loads tuning parameters from tuning.toml for easy adjustment without recompiling.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default tuning file path
pub const DEFAULT_TUNING_PATH: &str = "tuning.toml";

/// Top-level configuration structure
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub simulation: SimulationConfig,
    pub villager: VillagerConfig,
    pub sleep: SleepConfig,
    pub mood: MoodConfig,
    pub combat: CombatConfig,
    pub memory: MemoryConfig,
    pub death: DeathConfig,
}

/// Simulation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub default_ticks: u64,
    pub villager_count: usize,
    /// Spread of the spawn area around the origin, in blocks
    pub spawn_radius: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            default_ticks: 24_000,
            villager_count: 12,
            spawn_radius: 16.0,
        }
    }
}

/// Per-villager attributes and speech
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VillagerConfig {
    pub villager_max_health: f32,
    pub guard_max_health: f32,
    /// Prepended to everything a villager says; empty or "null" disables it
    pub chat_prefix: String,
    /// How far a player may be to receive an inventory-open request
    pub inventory_open_radius: f64,
    /// Ticks a swing animation lasts
    pub swing_duration: i32,
}

impl Default for VillagerConfig {
    fn default() -> Self {
        Self {
            villager_max_health: 20.0,
            guard_max_health: 40.0,
            chat_prefix: String::new(),
            inventory_open_radius: 10.0,
            swing_duration: 8,
        }
    }
}

/// Day/night cycle and sleep behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SleepConfig {
    pub day_length: u64,
    /// Time of day at which night begins
    pub night_start: u64,
    /// Time of day at which night ends
    pub night_end: u64,
    /// Ticks a villager stays awake after being woken by damage
    pub wake_cooldown: u32,
}

impl Default for SleepConfig {
    fn default() -> Self {
        Self {
            day_length: 24_000,
            night_start: 13_000,
            night_end: 23_000,
            wake_cooldown: 1_200,
        }
    }
}

/// Mood bounds and drift
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MoodConfig {
    pub max_level: f32,
    pub drift_interval: u64,
    pub drift_step: f32,
    pub marriage_bonus: f32,
    pub marriage_end_penalty: f32,
}

impl Default for MoodConfig {
    fn default() -> Self {
        Self {
            max_level: 15.0,
            drift_interval: 1_200,
            drift_step: 0.5,
            marriage_bonus: 5.0,
            marriage_end_penalty: -5.0,
        }
    }
}

/// Attack response and combat pacing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Ticks an attack response pursues before giving up
    pub response_duration: u32,
    pub attack_cooldown: u32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            response_duration: 200,
            attack_cooldown: 20,
        }
    }
}

/// Player memory accumulation and decay
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    pub fatigue_decay_interval: u64,
    pub max_fatigue: u32,
    pub greeting_cooldown: u32,
    pub acquaintance_hearts: i32,
    pub friend_hearts: i32,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            fatigue_decay_interval: 1_200,
            max_fatigue: 10,
            greeting_cooldown: 2_400,
            acquaintance_hearts: 10,
            friend_hearts: 50,
        }
    }
}

/// Death cascade parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeathConfig {
    pub mood_radius: f64,
    pub mood_penalty: f32,
}

impl Default for DeathConfig {
    fn default() -> Self {
        Self {
            mood_radius: 20.0,
            mood_penalty: -2.0,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from the given path, or use defaults if it cannot be read
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("Could not load {}: {}. Using defaults.", path.display(), e);
            Self::default()
        })
    }
}

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}
