//! Damage
//!
//! Applies a hit to a villager. Armor soaks part of it; a surviving villager
//! wakes up and turns on the attacker before this call returns.

use bevy_ecs::prelude::*;
use villager_events::{EventKind, PartyId};

use crate::actions::ActionRegistry;
use crate::components::{Attributes, Lifecycle};
use crate::config::Config;
use crate::error::{Result, VillagerError};

use super::death::on_death;
use super::equipment::{damage_armor, total_armor_value};
use super::{record_event, villager_id};

/// Armor points past this do not reduce damage further
const MAX_EFFECTIVE_ARMOR: i32 = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct DamageSource {
    pub amount: f32,
    /// Party that dealt the damage, if any
    pub originator: Option<PartyId>,
    /// Reported as the death cause if the hit is fatal
    pub cause: String,
}

impl DamageSource {
    pub fn new(amount: f32, cause: impl Into<String>) -> Self {
        Self {
            amount,
            originator: None,
            cause: cause.into(),
        }
    }

    pub fn by(mut self, originator: PartyId) -> Self {
        self.originator = Some(originator);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageOutcome {
    /// The villager was already dead
    Ignored,
    Survived { health: f32, woke: bool },
    Died,
}

/// Damage left after armor
pub fn armor_reduced(amount: f32, armor: i32) -> f32 {
    let armor = armor.clamp(0, MAX_EFFECTIVE_ARMOR) as f32;
    amount * (1.0 - armor / 25.0)
}

pub fn on_damage(world: &mut World, entity: Entity, source: DamageSource) -> Result<DamageOutcome> {
    let id = villager_id(world, entity)?;
    if !(source.amount >= 0.0) {
        return Err(VillagerError::InvalidArgument(format!(
            "damage amount must be non-negative, got {}",
            source.amount
        )));
    }
    if world.get::<Lifecycle>(entity).is_some_and(|life| life.deceased) {
        return Ok(DamageOutcome::Ignored);
    }

    let amount = armor_reduced(source.amount, total_armor_value(world, entity));
    damage_armor(world, entity, source.amount);

    let health = match world.get_mut::<Attributes>(entity) {
        Some(mut attributes) => {
            attributes.health = (attributes.health - amount).max(0.0);
            attributes.health
        }
        None => 0.0,
    };
    record_event(
        world,
        id,
        EventKind::Damaged {
            amount,
            originator: source.originator,
            health,
        },
    );

    if health <= 0.0 {
        on_death(world, entity, &source.cause)?;
        return Ok(DamageOutcome::Died);
    }

    let wake_cooldown = world.resource::<Config>().sleep.wake_cooldown;
    let (woke, responding) = match world.get_mut::<ActionRegistry>(entity) {
        Some(mut actions) => {
            let woke = actions
                .sleep_mut()
                .map(|sleep| sleep.on_damage(wake_cooldown))
                .unwrap_or(false);
            let responding = actions
                .attack_response_mut()
                .map(|response| response.start_response(source.originator))
                .unwrap_or(false);
            (woke, responding)
        }
        None => (false, false),
    };

    if woke {
        record_event(world, id, EventKind::WokeUp);
    }
    if let (true, Some(originator)) = (responding, source.originator) {
        record_event(world, id, EventKind::AttackResponseStarted { originator });
    }

    Ok(DamageOutcome::Survived { health, woke })
}
