//! Villager Persistence
//!
//! A saved villager is a JSON object of independent sections. Each section
//! decodes on its own and a missing section (or missing key inside one)
//! falls back to defaults, so saves written by older builds keep loading.

use bevy_ecs::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use villager_events::PartyId;

use crate::actions::ActionRegistry;
use crate::components::{
    Attributes, Inventory, Lifecycle, Position, RelationshipLedger, RelationshipState, Villager,
    VillagerId, VillagerIndex,
};
use crate::error::{Result, VillagerError};
use crate::setup::{insert_villager, standard_actions};
use crate::systems::{repair_stale_marriage, repair_unresolved_marriages, villager_id};

/// Saved form of one villager
pub type VillagerTag = Map<String, Value>;

const ID: &str = "id";
const ATTRIBUTES: &str = "attributes";
const RELATIONSHIP: &str = "relationship";
const MEMORIES: &str = "memories";
const INVENTORY: &str = "inventory";
const POSITION: &str = "position";
const BEHAVIORS: &str = "behaviors";
const LIFECYCLE: &str = "lifecycle";

fn write_section<T: Serialize>(tag: &mut VillagerTag, section: &'static str, value: Option<&T>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    let encoded = serde_json::to_value(value)
        .map_err(|source| VillagerError::Persistence { section, source })?;
    tag.insert(section.to_string(), encoded);
    Ok(())
}

fn read_section<T: DeserializeOwned + Default>(tag: &VillagerTag, section: &'static str) -> Result<T> {
    match tag.get(section) {
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|source| VillagerError::Persistence { section, source }),
        None => Ok(T::default()),
    }
}

pub fn save_villager(world: &World, entity: Entity) -> Result<VillagerTag> {
    let id = villager_id(world, entity)?;
    let mut tag = VillagerTag::new();

    write_section(&mut tag, ID, Some(&id))?;
    write_section(&mut tag, ATTRIBUTES, world.get::<Attributes>(entity))?;
    write_section(&mut tag, RELATIONSHIP, world.get::<RelationshipState>(entity))?;
    write_section(&mut tag, MEMORIES, world.get::<RelationshipLedger>(entity))?;
    write_section(&mut tag, INVENTORY, world.get::<Inventory>(entity))?;
    write_section(&mut tag, POSITION, world.get::<Position>(entity))?;
    write_section(&mut tag, LIFECYCLE, world.get::<Lifecycle>(entity))?;

    if let Some(actions) = world.get::<ActionRegistry>(entity) {
        let sections = actions.to_sections()?;
        write_section(&mut tag, BEHAVIORS, Some(&sections))?;
    }

    Ok(tag)
}

/// Spawn a villager from a saved tag.
///
/// A stale marriage on either side is repaired once the villager is in the
/// world: its own, and that of any loaded villager still claiming it.
pub fn load_villager(world: &mut World, tag: &VillagerTag) -> Result<Entity> {
    let id: PartyId = read_section(tag, ID)?;
    if id.is_empty() {
        return Err(VillagerError::InvalidArgument(
            "saved villager has no id".to_string(),
        ));
    }
    if world.resource::<VillagerIndex>().entity(id).is_some() {
        return Err(VillagerError::InvalidArgument(format!(
            "villager {} is already loaded",
            id
        )));
    }

    let attributes: Attributes = read_section(tag, ATTRIBUTES)?;
    let relationship: RelationshipState = read_section(tag, RELATIONSHIP)?;
    let ledger: RelationshipLedger = read_section(tag, MEMORIES)?;
    let inventory: Inventory = read_section(tag, INVENTORY)?;
    let position: Position = read_section(tag, POSITION)?;
    let lifecycle: Lifecycle = read_section(tag, LIFECYCLE)?;
    let behaviors: BTreeMap<String, Value> = read_section(tag, BEHAVIORS)?;

    let mut actions = standard_actions(world, attributes.profession);
    actions.load_sections(&behaviors)?;

    let deceased = lifecycle.deceased;
    let entity = insert_villager(
        world,
        id,
        (attributes, relationship, ledger, inventory, position, lifecycle, actions),
    );
    if deceased {
        world.resource_mut::<VillagerIndex>().deceased(id);
        return Ok(entity);
    }

    repair_stale_marriage(world, entity)?;

    let mut query = world.query_filtered::<(Entity, &RelationshipState), With<Villager>>();
    let claimants: Vec<Entity> = query
        .iter(world)
        .filter(|(other, state)| *other != entity && state.partner_id() == id)
        .map(|(other, _)| other)
        .collect();
    for claimant in claimants {
        repair_stale_marriage(world, claimant)?;
    }

    tracing::debug!("Loaded villager {}", id);
    Ok(entity)
}

/// Load a batch of saved villagers, such as everything saved at shutdown.
///
/// Once every tag is in, a marriage to a villager that is still unknown can
/// no longer be resolved and is reset.
pub fn load_villagers<'a>(
    world: &mut World,
    tags: impl IntoIterator<Item = &'a VillagerTag>,
) -> Result<Vec<Entity>> {
    let entities = tags
        .into_iter()
        .map(|tag| load_villager(world, tag))
        .collect::<Result<Vec<_>>>()?;
    let reset = repair_unresolved_marriages(world)?;
    tracing::debug!("Loaded {} villagers, reset {} unresolved marriages", entities.len(), reset);
    Ok(entities)
}

/// Save a villager and take it out of the world
pub fn unload_villager(world: &mut World, entity: Entity) -> Result<VillagerTag> {
    let tag = save_villager(world, entity)?;
    let id = world
        .get::<VillagerId>(entity)
        .map(|v| v.0)
        .unwrap_or_default();
    let deceased = world.get::<Lifecycle>(entity).is_some_and(|life| life.deceased);

    world.despawn(entity);
    if !deceased {
        world.resource_mut::<VillagerIndex>().unloaded(id);
    }
    tracing::debug!("Unloaded villager {}", id);
    Ok(tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::registry::ItemStack;
    use crate::setup::{init_world, spawn_villager, VillagerSeed};
    use villager_events::{Gender, Profession};

    #[test]
    fn test_missing_sections_use_defaults() {
        let mut world = init_world(Config::default(), 1);
        let id = PartyId::new_v4();
        let mut tag = VillagerTag::new();
        tag.insert(ID.to_string(), serde_json::to_value(id).unwrap());
        tag.insert(
            ATTRIBUTES.to_string(),
            serde_json::json!({ "name": "Ada", "profession": "smith" }),
        );

        let entity = load_villager(&mut world, &tag).unwrap();
        let attributes = world.get::<Attributes>(entity).unwrap();
        assert_eq!(attributes.name, "Ada");
        assert_eq!(attributes.profession, Profession::Smith);
        assert_eq!(attributes.health, 20.0);
        assert!(world.get::<Inventory>(entity).unwrap().is_empty());
        assert!(world.get::<ActionRegistry>(entity).unwrap().mood().is_ok());
        assert_eq!(world.resource::<VillagerIndex>().entity(id), Some(entity));
    }

    #[test]
    fn test_missing_id_is_rejected() {
        let mut world = init_world(Config::default(), 1);
        assert!(matches!(
            load_villager(&mut world, &VillagerTag::new()),
            Err(VillagerError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_malformed_section_names_the_section() {
        let mut world = init_world(Config::default(), 1);
        let mut tag = VillagerTag::new();
        tag.insert(ID.to_string(), serde_json::to_value(PartyId::new_v4()).unwrap());
        tag.insert(INVENTORY.to_string(), Value::String("full".to_string()));

        assert!(matches!(
            load_villager(&mut world, &tag),
            Err(VillagerError::Persistence { section: INVENTORY, .. })
        ));
    }

    #[test]
    fn test_unload_then_load() {
        let mut world = init_world(Config::default(), 1);
        let entity = spawn_villager(&mut world, VillagerSeed::new("Ada", Gender::Female, Profession::Miner));
        let id = villager_id(&world, entity).unwrap();
        world.get_mut::<Inventory>(entity).unwrap().set(5, Some(ItemStack::new("wheat", 12)));

        let tag = unload_villager(&mut world, entity).unwrap();
        assert_eq!(
            world.resource::<VillagerIndex>().get(id),
            Some(crate::components::IndexEntry::Unloaded)
        );

        let reloaded = load_villager(&mut world, &tag).unwrap();
        assert_eq!(villager_id(&world, reloaded).unwrap(), id);
        assert_eq!(world.get::<Inventory>(reloaded).unwrap().get(5).map(|s| s.count), Some(12));
        assert!(load_villager(&mut world, &tag).is_err());
    }
}
