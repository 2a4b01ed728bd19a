//! Death Cascade
//!
//! The fixed sequence run when a villager dies. Each step is recorded in the
//! villager's [`Lifecycle`] before it runs, so a repeated or re-entrant death
//! never repeats a step, and a cascade interrupted by a save resumes where it
//! stopped.

use bevy_ecs::prelude::*;
use villager_events::{EventKind, MaritalStatus, PartyId};

use crate::actions::ActionRegistry;
use crate::components::{
    Attributes, CascadeStep, Inventory, Lifecycle, Position, RelationshipLedger, RelationshipState,
    VillagerId, VillagerIndex,
};
use crate::config::Config;
use crate::error::{Result, VillagerError};
use crate::host::{
    villagers_within, DroppedItem, Localizer, PlayerRecords, Sessions, TaskScheduler, WorldClock,
    WorldItems,
};
use crate::registry::ItemStack;

use super::marriage::{end_marriage, resolve_spouse};
use super::speech::title_for;
use super::{record_event, villager_id};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathOutcome {
    /// This call ran (or finished) the cascade
    Completed,
    /// The cascade had already run to completion
    AlreadyRan,
}

/// Run the death cascade for a villager, at most once per step
pub fn on_death(world: &mut World, entity: Entity, cause: &str) -> Result<DeathOutcome> {
    let id = villager_id(world, entity)?;

    let first_death = {
        let Some(mut life) = world.get_mut::<Lifecycle>(entity) else {
            return Err(VillagerError::InvalidArgument(format!(
                "{:?} has no lifecycle",
                entity
            )));
        };
        if life.cascade_complete() {
            return Ok(DeathOutcome::AlreadyRan);
        }
        let first = !life.deceased;
        if first {
            life.deceased = true;
            life.cause = Some(cause.to_string());
        }
        first
    };

    if first_death {
        if let Some(mut attributes) = world.get_mut::<Attributes>(entity) {
            attributes.health = 0.0;
        }
        record_event(world, id, EventKind::Died { cause: cause.to_string() });
        tracing::info!("Villager {} died: {}", id, cause);
    }

    for &step in CascadeStep::all() {
        let claimed = match world.get_mut::<Lifecycle>(entity) {
            Some(mut life) if !life.has_completed(step) => {
                life.mark_completed(step);
                true
            }
            _ => false,
        };
        if claimed {
            tracing::debug!("Villager {} death step {:?}", id, step);
            run_step(world, entity, id, step);
        }
    }

    world.resource_mut::<VillagerIndex>().deceased(id);
    Ok(DeathOutcome::Completed)
}

fn run_step(world: &mut World, entity: Entity, id: PartyId, step: CascadeStep) {
    match step {
        CascadeStep::FreezeBehavior => freeze_behavior(world, entity),
        CascadeStep::PropagateMood => propagate_mood(world, entity),
        CascadeStep::DropInventory => drop_inventory(world, entity, id),
        CascadeStep::ResetPlayerSpouse => reset_player_spouse(world, entity, id),
        CascadeStep::ResetVillagerSpouse => reset_villager_spouse(world, entity, id),
        CascadeStep::NotifyFamily => notify_family(world, entity, id),
    }
}

fn freeze_behavior(world: &mut World, entity: Entity) {
    if let Some(mut actions) = world.get_mut::<ActionRegistry>(entity) {
        actions.disable_all_toggles();
        if let Ok(sleep) = actions.sleep_mut() {
            sleep.transition_skin_state(true);
        }
        if let Ok(response) = actions.attack_response_mut() {
            response.stop();
        }
    }
    if let Some(mut attributes) = world.get_mut::<Attributes>(entity) {
        attributes.set_attack_target(None);
    }
    if let Some(mut scheduler) = world.get_mut::<TaskScheduler>(entity) {
        scheduler.pathing_suspended = true;
        scheduler.clear_path();
    }
}

fn propagate_mood(world: &mut World, entity: Entity) {
    let Some(position) = world.get::<Position>(entity).copied() else {
        return;
    };
    let (radius, penalty, max_level) = {
        let config = world.resource::<Config>();
        (config.death.mood_radius, config.death.mood_penalty, config.mood.max_level)
    };

    for neighbor in villagers_within(world, &position, radius, entity) {
        let level = world
            .get_mut::<ActionRegistry>(neighbor)
            .and_then(|mut actions| {
                actions
                    .mood_mut()
                    .ok()
                    .map(|mood| mood.modify_mood_level(penalty, max_level))
            });
        let neighbor_id = world.get::<VillagerId>(neighbor).map(|v| v.0);
        if let (Some(level), Some(neighbor_id)) = (level, neighbor_id) {
            record_event(world, neighbor_id, EventKind::MoodChanged { delta: penalty, level });
        }
    }
}

fn drop_inventory(world: &mut World, entity: Entity, id: PartyId) {
    let position = world.get::<Position>(entity).copied().unwrap_or_default();
    let tick = world.resource::<WorldClock>().tick;

    let dropped: Vec<(usize, ItemStack)> = match world.get_mut::<Inventory>(entity) {
        Some(mut inventory) => {
            let slots: Vec<usize> = inventory.occupied().map(|(slot, _)| slot).collect();
            slots
                .into_iter()
                .filter_map(|slot| inventory.take(slot).map(|stack| (slot, stack)))
                .collect()
        }
        None => Vec::new(),
    };

    for (slot, stack) in dropped {
        record_event(
            world,
            id,
            EventKind::ItemDropped {
                slot,
                item: stack.item.clone(),
                count: stack.count,
            },
        );
        world.resource_mut::<WorldItems>().drop_item(DroppedItem {
            stack,
            position,
            dropped_by: id,
            slot,
            tick,
        });
    }
}

/// The dead villager's own fields are left as they are
fn reset_player_spouse(world: &mut World, entity: Entity, id: PartyId) {
    let status = world
        .get::<RelationshipState>(entity)
        .map(RelationshipState::marital_status);
    let Some(MaritalStatus::MarriedToPlayer(player)) = status else {
        return;
    };

    if let Some(record) = world.resource_mut::<PlayerRecords>().get_mut(player) {
        if record.marital_status.is_married_to(id) {
            record.reset_marriage();
            tracing::info!("Player {} widowed by villager {}", player, id);
        }
    }
}

fn reset_villager_spouse(world: &mut World, entity: Entity, id: PartyId) {
    let Ok(partner) = resolve_spouse(world, entity) else {
        return;
    };
    let references_us = world
        .get::<RelationshipState>(partner)
        .is_some_and(|state| state.marital_status().is_married_to(id));
    if references_us {
        if let Err(e) = end_marriage(world, partner) {
            tracing::warn!("Could not end marriage of partner {:?}: {}", partner, e);
        }
    }
}

fn notify_family(world: &mut World, entity: Entity, id: PartyId) {
    let Some(relationship) = world.get::<RelationshipState>(entity) else {
        return;
    };
    let spouse = relationship.marital_status();
    let family: Vec<PartyId> = world
        .get::<RelationshipLedger>(entity)
        .map(|ledger| {
            ledger
                .iter()
                .map(|record| record.party_id)
                .filter(|&party| spouse.is_married_to(party) || relationship.is_parent(party))
                .collect()
        })
        .unwrap_or_default();

    for party in family {
        if !world.resource::<Sessions>().is_online(party) {
            tracing::debug!("Skipping death notice for unreachable party {}", party);
            continue;
        }
        let title = title_for(world, entity, party);
        let text = world.resource::<Localizer>().format("notify.death", &[title.as_str()]);
        if world.resource_mut::<Sessions>().send_message(party, text) {
            record_event(world, id, EventKind::DeathNotified { recipient: party });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::{init_world, spawn_villager, VillagerSeed};
    use villager_events::{Gender, Profession};

    #[test]
    fn test_second_death_is_a_no_op() {
        let mut world = init_world(Config::default(), 3);
        let entity = spawn_villager(&mut world, VillagerSeed::new("Ada", Gender::Female, Profession::Baker));
        world
            .get_mut::<Inventory>(entity)
            .unwrap()
            .set(2, Some(ItemStack::new("bread", 3)));

        assert_eq!(on_death(&mut world, entity, "fell").unwrap(), DeathOutcome::Completed);
        assert_eq!(on_death(&mut world, entity, "fell").unwrap(), DeathOutcome::AlreadyRan);

        assert_eq!(world.resource::<WorldItems>().items.len(), 1);
        let life = world.get::<Lifecycle>(entity).unwrap();
        assert!(life.cascade_complete());
        assert_eq!(life.cause.as_deref(), Some("fell"));
    }

    #[test]
    fn test_interrupted_cascade_resumes() {
        let mut world = init_world(Config::default(), 3);
        let entity = spawn_villager(&mut world, VillagerSeed::new("Ada", Gender::Female, Profession::Baker));
        world
            .get_mut::<Inventory>(entity)
            .unwrap()
            .set(0, Some(ItemStack::single("wheat")));
        {
            let mut life = world.get_mut::<Lifecycle>(entity).unwrap();
            life.deceased = true;
            life.mark_completed(CascadeStep::FreezeBehavior);
            life.mark_completed(CascadeStep::PropagateMood);
            life.mark_completed(CascadeStep::DropInventory);
        }

        on_death(&mut world, entity, "starved").unwrap();

        // the drop step was already recorded, so nothing is released again
        assert!(world.resource::<WorldItems>().items.is_empty());
        assert!(world.get::<Lifecycle>(entity).unwrap().cascade_complete());
    }
}
