//! Villager Systems
//!
//! Operations on a single villager entity. Each takes the world and the
//! villager's `Entity`; cross-villager effects are applied synchronously.

pub mod arbiter;
pub mod damage;
pub mod death;
pub mod equipment;
pub mod interaction;
pub mod marriage;
pub mod speech;

pub use arbiter::{advance_clock, tick_villager, tick_villagers};
pub use damage::{on_damage, DamageOutcome, DamageSource};
pub use death::{on_death, DeathOutcome};
pub use equipment::{
    armor_items, damage_armor, damage_held_item, equipment_in_slot, held_item, swing_item,
    total_armor_value,
};
pub use interaction::{cure_infection, is_pushable, process_interact, InteractOutcome};
pub use marriage::{
    divorce, end_marriage, repair_stale_marriage, repair_unresolved_marriages, resolve_spouse,
    start_marriage, MarriageTarget,
};
pub use speech::{say, say_raw, title_for};

use bevy_ecs::prelude::*;
use villager_events::{EventKind, PartyId};

use crate::actions::{ActionHook, ActionRegistry};
use crate::components::{MemoryRecord, RelationshipLedger, RelationshipState, Villager, VillagerId};
use crate::config::Config;
use crate::error::{Result, VillagerError};
use crate::events::EventLog;
use crate::host::WorldClock;

/// Id of a villager entity, or `InvalidArgument` if the entity is not one
pub fn villager_id(world: &World, entity: Entity) -> Result<PartyId> {
    if world.get::<Villager>(entity).is_none() {
        return Err(VillagerError::InvalidArgument(format!(
            "{:?} is not a villager",
            entity
        )));
    }
    world
        .get::<VillagerId>(entity)
        .map(|id| id.0)
        .ok_or_else(|| VillagerError::InvalidArgument(format!("{:?} has no villager id", entity)))
}

pub fn relationship_state(world: &World, entity: Entity) -> Result<&RelationshipState> {
    villager_id(world, entity)?;
    world
        .get::<RelationshipState>(entity)
        .ok_or_else(|| VillagerError::InvalidArgument(format!("{:?} has no relationship state", entity)))
}

/// What the villager remembers about a party, if it has met them
pub fn memory_record(world: &World, entity: Entity, party: PartyId) -> Result<Option<&MemoryRecord>> {
    villager_id(world, entity)?;
    Ok(world
        .get::<RelationshipLedger>(entity)
        .and_then(|ledger| ledger.get(party)))
}

/// Append an event stamped with the current tick
pub(crate) fn record_event(world: &mut World, villager: PartyId, kind: EventKind) {
    let tick = world.get_resource::<WorldClock>().map_or(0, |clock| clock.tick);
    if let Some(mut log) = world.get_resource_mut::<EventLog>() {
        log.record(tick, villager, kind);
    }
}

/// Fire a lifecycle hook on every action of a villager
pub(crate) fn broadcast_hook(world: &mut World, entity: Entity, hook: ActionHook) {
    world.resource_scope(|world, config: Mut<Config>| {
        if let Some(mut actions) = world.get_mut::<ActionRegistry>(entity) {
            actions.broadcast(hook, &config);
        }
    });
}
