//! World-level Collaborators
//!
//! Clock, dropped items and the spatial proximity query.

use bevy_ecs::prelude::*;
use villager_events::PartyId;

use crate::components::{Lifecycle, Position, Villager, VillagerId};
use crate::config::SleepConfig;
use crate::registry::ItemStack;

/// Resource: simulation clock and day/night cycle
#[derive(Resource, Debug, Clone)]
pub struct WorldClock {
    pub tick: u64,
    day_length: u64,
    night_start: u64,
    night_end: u64,
}

impl WorldClock {
    pub fn new(config: &SleepConfig) -> Self {
        Self {
            tick: 0,
            day_length: config.day_length.max(1),
            night_start: config.night_start,
            night_end: config.night_end,
        }
    }

    pub fn advance(&mut self) {
        self.tick += 1;
    }

    pub fn time_of_day(&self) -> u64 {
        self.tick % self.day_length
    }

    pub fn is_night(&self) -> bool {
        let t = self.time_of_day();
        t >= self.night_start && t < self.night_end
    }

    /// Jump to a time of day without changing the day count
    pub fn set_time_of_day(&mut self, time: u64) {
        self.tick = self.tick - self.time_of_day() + (time % self.day_length);
    }
}

/// An item released into the world
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedItem {
    pub stack: ItemStack,
    pub position: Position,
    pub dropped_by: PartyId,
    pub slot: usize,
    pub tick: u64,
}

/// Resource: items lying in the world
#[derive(Resource, Debug, Default)]
pub struct WorldItems {
    pub items: Vec<DroppedItem>,
}

impl WorldItems {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drop_item(&mut self, item: DroppedItem) {
        self.items.push(item);
    }

    pub fn dropped_by(&self, villager: PartyId) -> impl Iterator<Item = &DroppedItem> {
        self.items.iter().filter(move |i| i.dropped_by == villager)
    }
}

/// Living villagers within `distance` of `center`, excluding `exclude`.
///
/// Results are sorted by villager id so callers see a stable order.
pub fn villagers_within(
    world: &mut World,
    center: &Position,
    distance: f64,
    exclude: Entity,
) -> Vec<Entity> {
    let mut query = world.query_filtered::<(Entity, &VillagerId, &Position, &Lifecycle), With<Villager>>();
    let mut found: Vec<(PartyId, Entity)> = query
        .iter(world)
        .filter(|(entity, _, pos, life)| {
            *entity != exclude && !life.deceased && pos.within(center, distance)
        })
        .map(|(entity, id, _, _)| (id.0, entity))
        .collect();
    found.sort_by_key(|(id, _)| *id);
    found.into_iter().map(|(_, entity)| entity).collect()
}
