//! Spawn Sync
//!
//! Builds the spawn-time snapshot a client needs to render a villager, and
//! applies one on the receiving side. The byte layout lives with
//! [`SpawnData`] in the events crate.

use bevy_ecs::prelude::*;
use villager_events::SpawnData;

use crate::actions::ActionRegistry;
use crate::components::{
    Attributes, Inventory, Lifecycle, Position, RelationshipLedger, RelationshipState,
    VillagerIndex,
};
use crate::error::{Result, VillagerError};
use crate::setup::{insert_villager, standard_actions};
use crate::systems::villager_id;

pub fn spawn_data(world: &World, entity: Entity) -> Result<SpawnData> {
    let id = villager_id(world, entity)?;
    let attributes = world
        .get::<Attributes>(entity)
        .ok_or_else(|| VillagerError::InvalidArgument(format!("{:?} has no attributes", entity)))?;
    let relationship = world.get::<RelationshipState>(entity).cloned().unwrap_or_default();
    let sleeping_skin = world
        .get::<ActionRegistry>(entity)
        .and_then(|actions| actions.sleep().ok().map(|sleep| sleep.sleeping_skin()))
        .unwrap_or(false);

    Ok(SpawnData {
        id,
        name: attributes.name.clone(),
        gender: attributes.gender,
        profession: attributes.profession,
        movement_state: attributes.movement_state,
        baby_state: attributes.baby_state,
        infected: attributes.infected,
        marital_status: relationship.marital_status(),
        partner_name: relationship.partner_name().to_string(),
        partner_gender: relationship.partner_gender(),
        sleeping_skin,
    })
}

/// Spawn the client-side mirror of a villager from its spawn data
pub fn apply_spawn_data(world: &mut World, data: &SpawnData) -> Result<Entity> {
    if world.resource::<VillagerIndex>().entity(data.id).is_some() {
        return Err(VillagerError::InvalidArgument(format!(
            "villager {} is already spawned",
            data.id
        )));
    }

    let mut attributes = Attributes::new(data.name.clone(), data.gender, data.profession);
    attributes.movement_state = data.movement_state;
    attributes.baby_state = data.baby_state;
    attributes.infected = data.infected;

    let mut relationship = RelationshipState::new();
    if data.marital_status.is_married() {
        relationship.set_married(data.marital_status, data.partner_name.clone(), data.partner_gender);
    }

    let mut actions = standard_actions(world, data.profession);
    if let Ok(sleep) = actions.sleep_mut() {
        sleep.transition_skin_state(data.sleeping_skin);
    }

    Ok(insert_villager(
        world,
        data.id,
        (
            attributes,
            relationship,
            RelationshipLedger::new(),
            Inventory::new(),
            Position::default(),
            Lifecycle::default(),
            actions,
        ),
    ))
}
