//! Player Interaction
//!
//! Right-click handling and small state queries used by the host.

use bevy_ecs::prelude::*;
use serde_json::Value;
use villager_events::{EventKind, PartyId};

use crate::actions::ActionRegistry;
use crate::components::{Attributes, Lifecycle, RelationshipLedger, VillagerIndex};
use crate::error::Result;
use crate::host::{Screen, Sessions};
use crate::persistence::save_villager;
use crate::registry::{ItemRegistry, ItemStack};

use super::{record_event, villager_id};

#[derive(Debug, Clone, PartialEq)]
pub enum InteractOutcome {
    /// Dead villager or offline player
    Ignored,
    OpenedScreen(Screen),
    /// The villager now lives in the returned memorial item
    Captured(ItemStack),
}

/// Handle a player interacting with a villager while holding `held`.
///
/// The player's memory record is created on first contact. A creative player
/// holding an empty memorial captures the villager into it; the villager
/// leaves the world without dying.
pub fn process_interact(
    world: &mut World,
    entity: Entity,
    player: PartyId,
    held: Option<ItemStack>,
) -> Result<InteractOutcome> {
    let id = villager_id(world, entity)?;
    if world.get::<Lifecycle>(entity).is_some_and(|life| life.deceased) {
        return Ok(InteractOutcome::Ignored);
    }
    let Some((player_name, creative)) = world
        .resource::<Sessions>()
        .get(player)
        .map(|session| (session.name.clone(), session.creative))
    else {
        return Ok(InteractOutcome::Ignored);
    };

    let relation = world.get_mut::<RelationshipLedger>(entity).map(|mut ledger| {
        let memory = ledger.record_for(player);
        memory.party_name = player_name.clone();
        memory.relation
    });

    let (is_memorial, is_editor) = {
        let items = world.resource::<ItemRegistry>();
        held.as_ref().map_or((false, false), |stack| {
            (items.is_memorial(stack), items.is_editor(stack))
        })
    };

    match held {
        Some(mut memorial) if creative && is_memorial && memorial.tag.is_none() => {
            let saved = save_villager(world, entity)?;
            let tag = memorial.tag_mut();
            tag.insert("ownerName".to_string(), Value::from(player_name));
            tag.insert(
                "relation".to_string(),
                Value::from(relation.map_or(0, |r| r.id())),
            );
            tag.insert("villager".to_string(), Value::Object(saved));

            world.despawn(entity);
            world.resource_mut::<VillagerIndex>().unloaded(id);
            record_event(world, id, EventKind::CapturedInMemorial { player });
            tracing::info!("Villager {} captured in a memorial by {}", id, player);
            Ok(InteractOutcome::Captured(memorial))
        }
        _ => {
            let screen = if is_editor { Screen::Editor } else { Screen::Interact };
            world.resource_mut::<Sessions>().open_screen(player, screen);
            record_event(
                world,
                id,
                EventKind::ScreenOpened {
                    player,
                    screen: screen.as_str().to_string(),
                },
            );
            Ok(InteractOutcome::OpenedScreen(screen))
        }
    }
}

/// Clear an infection. Returns true if the villager was infected.
pub fn cure_infection(world: &mut World, entity: Entity) -> Result<bool> {
    let id = villager_id(world, entity)?;
    let cured = match world.get_mut::<Attributes>(entity) {
        Some(mut attributes) if attributes.infected => {
            attributes.infected = false;
            true
        }
        _ => false,
    };
    if cured {
        record_event(world, id, EventKind::InfectionCured);
    }
    Ok(cured)
}

/// Sleeping villagers cannot be pushed around
pub fn is_pushable(world: &World, entity: Entity) -> bool {
    !world
        .get::<ActionRegistry>(entity)
        .is_some_and(ActionRegistry::is_sleeping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{IndexEntry, Position};
    use crate::config::Config;
    use crate::host::{Session, WorldItems};
    use crate::registry::items::{MEMORIAL, VILLAGER_EDITOR};
    use crate::setup::{init_world, spawn_villager, VillagerSeed};
    use villager_events::{Gender, Profession, Relation};

    fn setup(creative: bool) -> (World, Entity, PartyId) {
        let mut world = init_world(Config::default(), 2);
        let entity = spawn_villager(&mut world, VillagerSeed::new("Ada", Gender::Female, Profession::Priest));
        let player = PartyId::new_v4();
        let mut session = Session::new(player, "Steve", Position::default());
        session.creative = creative;
        world.resource_mut::<Sessions>().connect(session);
        (world, entity, player)
    }

    #[test]
    fn test_interaction_creates_memory_and_opens_screen() {
        let (mut world, entity, player) = setup(false);
        let outcome = process_interact(&mut world, entity, player, None).unwrap();

        assert_eq!(outcome, InteractOutcome::OpenedScreen(Screen::Interact));
        let ledger = world.get::<RelationshipLedger>(entity).unwrap();
        assert_eq!(ledger.get(player).unwrap().party_name, "Steve");
        assert_eq!(ledger.get(player).unwrap().relation, Relation::Stranger);
    }

    #[test]
    fn test_editor_opens_editor() {
        let (mut world, entity, player) = setup(false);
        let outcome =
            process_interact(&mut world, entity, player, Some(ItemStack::single(VILLAGER_EDITOR))).unwrap();
        assert_eq!(outcome, InteractOutcome::OpenedScreen(Screen::Editor));
    }

    #[test]
    fn test_memorial_capture_needs_creative() {
        let (mut world, entity, player) = setup(false);
        let outcome =
            process_interact(&mut world, entity, player, Some(ItemStack::single(MEMORIAL))).unwrap();
        assert_eq!(outcome, InteractOutcome::OpenedScreen(Screen::Interact));
    }

    #[test]
    fn test_memorial_capture() {
        let (mut world, entity, player) = setup(true);
        let id = villager_id(&world, entity).unwrap();

        let InteractOutcome::Captured(memorial) =
            process_interact(&mut world, entity, player, Some(ItemStack::single(MEMORIAL))).unwrap()
        else {
            panic!("expected capture");
        };

        let tag = memorial.tag.unwrap();
        assert_eq!(tag["ownerName"], "Steve");
        assert_eq!(tag["relation"], 0);
        assert!(tag["villager"].is_object());
        assert!(world.get_entity(entity).is_none());
        assert_eq!(world.resource::<VillagerIndex>().get(id), Some(IndexEntry::Unloaded));
        assert!(world.resource::<WorldItems>().items.is_empty());
    }

    #[test]
    fn test_cure_and_push() {
        let (mut world, entity, _) = setup(false);
        assert!(!cure_infection(&mut world, entity).unwrap());
        world.get_mut::<Attributes>(entity).unwrap().infected = true;
        assert!(cure_infection(&mut world, entity).unwrap());

        assert!(is_pushable(&world, entity));
        world
            .get_mut::<ActionRegistry>(entity)
            .unwrap()
            .sleep_mut()
            .unwrap()
            .fall_asleep();
        assert!(!is_pushable(&world, entity));
    }
}
