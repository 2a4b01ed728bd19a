//! Marriage State Machine
//!
//! `Unmarried -> MarriedToVillager | MarriedToPlayer -> Unmarried`.
//!
//! Starting a marriage writes both sides in one call. `end_marriage` only
//! resets the caller; `divorce` ends both sides when the partner can be
//! reached. A partner that cannot be reached keeps its stale reference until
//! it is next loaded, where `repair_stale_marriage` resets it. After a load
//! pass, `repair_unresolved_marriages` resets marriages to villagers the
//! index has never seen.

use bevy_ecs::prelude::*;
use villager_events::{EventKind, Gender, MaritalStatus, PartyId, Relation};

use crate::actions::ActionHook;
use crate::components::{
    Attributes, IndexEntry, Lifecycle, RelationshipLedger, RelationshipState, Villager,
    VillagerId, VillagerIndex,
};
use crate::config::Config;
use crate::error::{Result, VillagerError};
use crate::host::PlayerRecords;

use super::{broadcast_hook, record_event, relationship_state, villager_id};

/// Who a villager is marrying
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarriageTarget {
    Villager(Entity),
    Player(PartyId),
}

impl MarriageTarget {
    /// Build a target from two optional references; exactly one must be set
    pub fn from_parts(villager: Option<Entity>, player: Option<PartyId>) -> Result<Self> {
        match (villager, player) {
            (Some(entity), None) => Ok(MarriageTarget::Villager(entity)),
            (None, Some(player)) => Ok(MarriageTarget::Player(player)),
            (None, None) => Err(VillagerError::InvalidArgument(
                "marriage target names neither a villager nor a player".to_string(),
            )),
            (Some(_), Some(_)) => Err(VillagerError::InvalidArgument(
                "marriage target names both a villager and a player".to_string(),
            )),
        }
    }
}

fn identity(world: &World, entity: Entity) -> (String, Gender) {
    world
        .get::<Attributes>(entity)
        .map(|attrs| (attrs.name.clone(), attrs.gender))
        .unwrap_or_default()
}

fn ensure_living(world: &World, entity: Entity) -> Result<()> {
    if world.get::<Lifecycle>(entity).is_some_and(|life| life.deceased) {
        return Err(VillagerError::InvalidArgument(format!(
            "{:?} is deceased",
            entity
        )));
    }
    Ok(())
}

/// Marry a villager to another villager or to a player.
///
/// Both parties must be unmarried; that is the caller's responsibility.
/// Nothing is written unless every argument checks out.
pub fn start_marriage(world: &mut World, entity: Entity, target: MarriageTarget) -> Result<()> {
    let id = villager_id(world, entity)?;
    ensure_living(world, entity)?;
    let (name, gender) = identity(world, entity);

    match target {
        MarriageTarget::Villager(other) => {
            if other == entity {
                return Err(VillagerError::InvalidArgument(
                    "a villager cannot marry itself".to_string(),
                ));
            }
            let other_id = villager_id(world, other)?;
            ensure_living(world, other)?;
            relationship_state(world, entity)?;
            relationship_state(world, other)?;
            let (other_name, other_gender) = identity(world, other);

            if let Some(mut state) = world.get_mut::<RelationshipState>(entity) {
                state.set_married(MaritalStatus::MarriedToVillager(other_id), other_name.as_str(), other_gender);
            }
            if let Some(mut state) = world.get_mut::<RelationshipState>(other) {
                state.set_married(MaritalStatus::MarriedToVillager(id), name.as_str(), gender);
            }

            broadcast_hook(world, entity, ActionHook::MarriedToVillager);
            broadcast_hook(world, other, ActionHook::MarriedToVillager);
            record_event(world, id, EventKind::MarriedToVillager { partner: other_id });
            record_event(world, other_id, EventKind::MarriedToVillager { partner: id });
            tracing::info!("{} married {}", name, other_name);
        }
        MarriageTarget::Player(player) => {
            if player.is_empty() {
                return Err(VillagerError::InvalidArgument(
                    "cannot marry the empty id".to_string(),
                ));
            }
            relationship_state(world, entity)?;
            let (player_name, player_gender) = world
                .resource::<PlayerRecords>()
                .get(player)
                .map(|record| (record.name.clone(), record.gender))
                .ok_or_else(|| {
                    VillagerError::InvalidArgument(format!("no record for player {}", player))
                })?;

            if let Some(mut state) = world.get_mut::<RelationshipState>(entity) {
                state.set_married(MaritalStatus::MarriedToPlayer(player), player_name.as_str(), player_gender);
            }
            if let Some(record) = world.resource_mut::<PlayerRecords>().get_mut(player) {
                record.set_married(MaritalStatus::MarriedToVillager(id), name.as_str(), gender);
            }
            if let Some(mut ledger) = world.get_mut::<RelationshipLedger>(entity) {
                let memory = ledger.record_for(player);
                memory.party_name = player_name.clone();
                memory.relation = Relation::Spouse;
            }

            broadcast_hook(world, entity, ActionHook::MarriedToPlayer);
            record_event(world, id, EventKind::MarriedToPlayer { partner: player });
            tracing::info!("{} married player {}", name, player_name);
        }
    }

    Ok(())
}

/// Clear the caller's marital fields, leaving the partner untouched
fn reset_own_fields(world: &mut World, entity: Entity) -> MaritalStatus {
    let Some(mut state) = world.get_mut::<RelationshipState>(entity) else {
        return MaritalStatus::Unmarried;
    };
    let status = state.marital_status();
    state.reset_to_unmarried();

    if let MaritalStatus::MarriedToPlayer(player) = status {
        world.resource_scope(|world, config: Mut<Config>| {
            if let Some(mut ledger) = world.get_mut::<RelationshipLedger>(entity) {
                let memory = ledger.record_for(player);
                if memory.relation == Relation::Spouse {
                    memory.clear_family_relation(&config.memory);
                }
            }
        });
    }
    status
}

/// Reset the caller's side and fire the marriage-ended hook
fn close_own_marriage(world: &mut World, entity: Entity, id: PartyId) -> Option<PartyId> {
    let status = reset_own_fields(world, entity);
    if !status.is_married() {
        return None;
    }

    let former = status.partner_id();
    broadcast_hook(world, entity, ActionHook::MarriageEnded);
    record_event(world, id, EventKind::MarriageEnded { former_partner: former });
    Some(former)
}

/// End the caller's marriage only. Returns the former partner, if any.
///
/// The partner keeps its reference; use [`divorce`] to end both sides.
pub fn end_marriage(world: &mut World, entity: Entity) -> Result<Option<PartyId>> {
    let id = villager_id(world, entity)?;
    let former = close_own_marriage(world, entity, id);
    if let Some(former) = former {
        tracing::debug!("Villager {} ended marriage with {}", id, former);
    }
    Ok(former)
}

/// End a marriage on both sides. An unloaded villager partner is repaired
/// when it is next loaded.
pub fn divorce(world: &mut World, entity: Entity) -> Result<()> {
    let id = villager_id(world, entity)?;
    let status = relationship_state(world, entity)?.marital_status();

    match status {
        MaritalStatus::Unmarried => return Ok(()),
        MaritalStatus::MarriedToVillager(_) => match resolve_spouse(world, entity) {
            Ok(partner) => {
                let references_us = world
                    .get::<RelationshipState>(partner)
                    .is_some_and(|state| state.marital_status().is_married_to(id));
                if references_us {
                    end_marriage(world, partner)?;
                }
            }
            Err(VillagerError::AbsentTarget(partner)) => {
                tracing::debug!("Partner {} not loaded; it will be repaired on load", partner);
            }
            Err(e) => return Err(e),
        },
        MaritalStatus::MarriedToPlayer(player) => {
            if let Some(record) = world.resource_mut::<PlayerRecords>().get_mut(player) {
                if record.marital_status.is_married_to(id) {
                    record.reset_marriage();
                }
            }
        }
    }

    end_marriage(world, entity)?;
    tracing::info!("Villager {} divorced", id);
    Ok(())
}

/// The loaded, living entity of a villager's spouse
pub fn resolve_spouse(world: &World, entity: Entity) -> Result<Entity> {
    let MaritalStatus::MarriedToVillager(partner) = relationship_state(world, entity)?.marital_status() else {
        return Err(VillagerError::InvalidArgument(format!(
            "{:?} is not married to a villager",
            entity
        )));
    };

    world
        .resource::<VillagerIndex>()
        .entity(partner)
        .filter(|&e| world.get::<Lifecycle>(e).is_some_and(|life| !life.deceased))
        .ok_or(VillagerError::AbsentTarget(partner))
}

fn is_stale(world: &World, id: PartyId, status: MaritalStatus, unknown_is_stale: bool) -> bool {
    match status {
        MaritalStatus::Unmarried => false,
        MaritalStatus::MarriedToVillager(partner) => {
            match world.resource::<VillagerIndex>().get(partner) {
                Some(IndexEntry::Deceased) => true,
                Some(IndexEntry::Unloaded) => false,
                None => unknown_is_stale,
                Some(IndexEntry::Loaded(other)) => !world
                    .get::<RelationshipState>(other)
                    .is_some_and(|state| state.marital_status().is_married_to(id)),
            }
        }
        MaritalStatus::MarriedToPlayer(player) => !world
            .resource::<PlayerRecords>()
            .get(player)
            .is_some_and(|record| record.marital_status.is_married_to(id)),
    }
}

fn repair(world: &mut World, entity: Entity, unknown_is_stale: bool) -> Result<bool> {
    let id = villager_id(world, entity)?;
    let status = relationship_state(world, entity)?.marital_status();
    if !is_stale(world, id, status, unknown_is_stale) {
        return Ok(false);
    }

    let former = status.partner_id();
    close_own_marriage(world, entity, id);
    record_event(world, id, EventKind::StaleMarriageRepaired { former_partner: former });
    tracing::info!("Villager {} reset stale marriage to {}", id, former);
    Ok(true)
}

/// Reset a marriage whose partner is gone or no longer married to us.
///
/// A villager partner that is unloaded, or not yet known to the index, is left
/// alone. Returns true if the marriage was reset.
pub fn repair_stale_marriage(world: &mut World, entity: Entity) -> Result<bool> {
    repair(world, entity, false)
}

/// Repair every loaded, living villager once a load pass has finished.
///
/// A villager partner the index still has no entry for cannot be resolved and
/// counts as absent. Returns the number of marriages reset.
pub fn repair_unresolved_marriages(world: &mut World) -> Result<usize> {
    let mut query = world.query_filtered::<(Entity, &VillagerId, &Lifecycle), With<Villager>>();
    let mut living: Vec<(PartyId, Entity)> = query
        .iter(world)
        .filter(|(_, _, life)| !life.deceased)
        .map(|(entity, id, _)| (id.0, entity))
        .collect();
    living.sort_by_key(|(id, _)| *id);

    let mut reset = 0;
    for (_, entity) in living {
        if repair(world, entity, true)? {
            reset += 1;
        }
    }
    Ok(reset)
}
