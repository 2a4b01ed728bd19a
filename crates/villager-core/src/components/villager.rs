//! Villager Components
//!
//! Identity, attributes, position and lifecycle of a villager entity.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use villager_events::{BabyState, Gender, MovementState, PartyId, Profession};

/// Marker component identifying an entity as a villager
#[derive(Component, Debug, Clone, Default)]
pub struct Villager;

/// Stable identity of a villager
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VillagerId(pub PartyId);

/// Serializable attributes of a villager.
///
/// Identity and health are plain fields. The attack target, swing counter and
/// inventory-open request are private and change only through their setters.
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attributes {
    pub name: String,
    pub gender: Gender,
    pub profession: Profession,
    pub movement_state: MovementState,
    pub baby_state: BabyState,
    pub infected: bool,
    pub health: f32,
    pub max_health: f32,
    pub ticks_alive: u64,
    is_swinging: bool,
    swing_progress_ticks: i32,
    attack_target: Option<PartyId>,
    do_open_inventory: bool,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            name: String::new(),
            gender: Gender::Unassigned,
            profession: Profession::Nitwit,
            movement_state: MovementState::Move,
            baby_state: BabyState::None,
            infected: false,
            health: 20.0,
            max_health: 20.0,
            ticks_alive: 0,
            is_swinging: false,
            swing_progress_ticks: 0,
            attack_target: None,
            do_open_inventory: false,
        }
    }
}

impl Attributes {
    pub fn new(name: impl Into<String>, gender: Gender, profession: Profession) -> Self {
        Self {
            name: name.into(),
            gender,
            profession,
            ..Self::default()
        }
    }

    pub fn set_movement_state(&mut self, state: MovementState) {
        self.movement_state = state;
    }

    pub fn attack_target(&self) -> Option<PartyId> {
        self.attack_target
    }

    pub fn set_attack_target(&mut self, target: Option<PartyId>) {
        self.attack_target = target;
    }

    pub fn is_swinging(&self) -> bool {
        self.is_swinging
    }

    /// Fraction of the swing animation completed, 0.0 to 1.0
    pub fn swing_progress(&self, swing_duration: i32) -> f32 {
        self.swing_progress_ticks.max(0) as f32 / swing_duration as f32
    }

    /// Start a swing unless one is already in its first half
    pub fn start_swing(&mut self, swing_duration: i32) {
        if !self.is_swinging
            || self.swing_progress_ticks >= swing_duration / 2
            || self.swing_progress_ticks < 0
        {
            self.swing_progress_ticks = -1;
            self.is_swinging = true;
        }
    }

    /// Advance the swing counter; it resets itself after `swing_duration` ticks.
    pub fn update_swinging(&mut self, swing_duration: i32) {
        if self.is_swinging {
            self.swing_progress_ticks += 1;
            if self.swing_progress_ticks >= swing_duration {
                self.swing_progress_ticks = 0;
                self.is_swinging = false;
            }
        } else {
            self.swing_progress_ticks = 0;
        }
    }

    pub fn request_inventory_open(&mut self) {
        self.do_open_inventory = true;
    }

    /// Consume a pending inventory-open request
    pub fn take_inventory_request(&mut self) -> bool {
        std::mem::take(&mut self.do_open_inventory)
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }
}

/// Position in the world
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn distance_sq(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    pub fn within(&self, other: &Position, distance: f64) -> bool {
        self.distance_sq(other) <= distance * distance
    }
}

/// One step of the death cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CascadeStep {
    FreezeBehavior,
    PropagateMood,
    DropInventory,
    ResetPlayerSpouse,
    ResetVillagerSpouse,
    NotifyFamily,
}

impl CascadeStep {
    pub fn all() -> &'static [CascadeStep] {
        &[
            CascadeStep::FreezeBehavior,
            CascadeStep::PropagateMood,
            CascadeStep::DropInventory,
            CascadeStep::ResetPlayerSpouse,
            CascadeStep::ResetVillagerSpouse,
            CascadeStep::NotifyFamily,
        ]
    }
}

/// Death guard: which cascade steps have already run
#[derive(Component, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lifecycle {
    pub deceased: bool,
    pub cause: Option<String>,
    completed: Vec<CascadeStep>,
}

impl Lifecycle {
    pub fn has_completed(&self, step: CascadeStep) -> bool {
        self.completed.contains(&step)
    }

    pub fn mark_completed(&mut self, step: CascadeStep) {
        if !self.has_completed(step) {
            self.completed.push(step);
        }
    }

    pub fn cascade_complete(&self) -> bool {
        CascadeStep::all().iter().all(|s| self.has_completed(*s))
    }

    pub fn completed_steps(&self) -> &[CascadeStep] {
        &self.completed
    }
}

/// Where a known villager currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexEntry {
    Loaded(Entity),
    Unloaded,
    Deceased,
}

/// Resource: every villager id the world has seen
#[derive(Resource, Debug, Default)]
pub struct VillagerIndex {
    entries: HashMap<PartyId, IndexEntry>,
}

impl VillagerIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loaded(&mut self, id: PartyId, entity: Entity) {
        self.entries.insert(id, IndexEntry::Loaded(entity));
    }

    pub fn unloaded(&mut self, id: PartyId) {
        self.entries.insert(id, IndexEntry::Unloaded);
    }

    pub fn deceased(&mut self, id: PartyId) {
        self.entries.insert(id, IndexEntry::Deceased);
    }

    pub fn get(&self, id: PartyId) -> Option<IndexEntry> {
        self.entries.get(&id).copied()
    }

    /// Entity of a loaded villager
    pub fn entity(&self, id: PartyId) -> Option<Entity> {
        match self.get(id) {
            Some(IndexEntry::Loaded(entity)) => Some(entity),
            _ => None,
        }
    }
}
