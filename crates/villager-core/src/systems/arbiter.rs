//! Behavior Arbiter
//!
//! Runs a villager's per-tick update: actions, memory, housekeeping, and
//! finally the decision of how much of the host scheduler may run.
//!
//! | Sleeping | MovementState | Scheduler                              |
//! |----------|---------------|----------------------------------------|
//! | yes      | any           | suspended, path cleared                |
//! | no       | Move, Follow  | full tick                              |
//! | no       | Stay          | task hook only, path cleared each tick |
//!
//! Pursuing an attacker claims no more than the movement state allows.

use bevy_ecs::prelude::*;
use villager_events::{EventKind, MovementState, PartyId};

use crate::actions::{ActionContext, ActionRegistry, MovementOverride};
use crate::components::{Attributes, Inventory, Lifecycle, Position, RelationshipLedger, Villager, VillagerId};
use crate::config::Config;
use crate::host::{Screen, Sessions, TaskScheduler, WorldClock};
use crate::registry::items::tick_baby;
use crate::registry::ItemRegistry;

use super::record_event;

/// Side effects that need world access after the villager's components are released
struct TickOutcome {
    villager: PartyId,
    position: Position,
    events: Vec<EventKind>,
    open_inventory: bool,
}

/// Apply the scheduler table for this tick
fn arbitrate_movement(
    claim: Option<MovementOverride>,
    state: MovementState,
    scheduler: &mut TaskScheduler,
    position: &mut Position,
) {
    match claim {
        Some(MovementOverride::Sleep) => {
            scheduler.pathing_suspended = true;
            scheduler.clear_path();
        }
        Some(MovementOverride::Pursue(_)) | None => {
            scheduler.pathing_suspended = false;
            match state {
                MovementState::Move | MovementState::Follow => scheduler.run_full_tick(position),
                MovementState::Stay => {
                    scheduler.run_task_hook();
                    scheduler.clear_path();
                }
            }
        }
    }
}

/// Advance one villager by one tick. Deceased villagers are skipped.
pub fn tick_villager(world: &mut World, entity: Entity) {
    let alive = world
        .get::<Lifecycle>(entity)
        .is_some_and(|life| !life.deceased);
    if !alive {
        return;
    }

    let (now, is_night) = {
        let clock = world.resource::<WorldClock>();
        (clock.tick, clock.is_night())
    };

    let outcome = world.resource_scope(|world, config: Mut<Config>| {
        world.resource_scope(|world, items: Mut<ItemRegistry>| {
            let mut query = world.query_filtered::<(
                &VillagerId,
                &mut Attributes,
                &mut ActionRegistry,
                &mut Inventory,
                &mut RelationshipLedger,
                &mut TaskScheduler,
                &mut Position,
            ), With<Villager>>();
            let Ok((id, mut attributes, mut actions, mut inventory, mut ledger, mut scheduler, mut position)) =
                query.get_mut(world, entity)
            else {
                return None;
            };

            let mut ctx = ActionContext {
                tick: now,
                is_night,
                attributes: &mut attributes,
                inventory: &inventory,
                items: &items,
                config: &config,
                events: Vec::new(),
            };
            actions.tick_all(&mut ctx);
            let events = ctx.events;

            ledger.tick(now, &config.memory);

            attributes.ticks_alive += 1;
            attributes.update_swinging(config.villager.swing_duration);
            for (_, stack) in inventory.occupied_mut() {
                if items.is_baby_carrier(stack) {
                    tick_baby(stack);
                }
            }
            let open_inventory = attributes.take_inventory_request();

            arbitrate_movement(
                actions.movement_override(),
                attributes.movement_state,
                &mut scheduler,
                &mut position,
            );

            Some(TickOutcome {
                villager: id.0,
                position: *position,
                events,
                open_inventory,
            })
        })
    });

    let Some(outcome) = outcome else {
        return;
    };

    for kind in outcome.events {
        record_event(world, outcome.villager, kind);
    }

    if outcome.open_inventory {
        let radius = world.resource::<Config>().villager.inventory_open_radius;
        let mut sessions = world.resource_mut::<Sessions>();
        let opened = sessions
            .closest_within(&outcome.position, radius)
            .filter(|&player| sessions.open_screen(player, Screen::Inventory));
        if let Some(player) = opened {
            record_event(world, outcome.villager, EventKind::InventoryOpened { player });
        }
    }
}

/// System: tick every loaded, living villager in id order
pub fn tick_villagers(world: &mut World) {
    let mut query = world.query_filtered::<(Entity, &VillagerId, &Lifecycle), With<Villager>>();
    let mut villagers: Vec<(PartyId, Entity)> = query
        .iter(world)
        .filter(|(_, _, life)| !life.deceased)
        .map(|(entity, id, _)| (id.0, entity))
        .collect();
    villagers.sort_by_key(|(id, _)| *id);

    for (_, entity) in villagers {
        tick_villager(world, entity);
    }
}

/// System: advance the world clock after villagers have ticked
pub fn advance_clock(mut clock: ResMut<WorldClock>) {
    clock.advance();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sleep_suspends_in_every_state() {
        for state in [MovementState::Move, MovementState::Follow, MovementState::Stay] {
            let mut scheduler = TaskScheduler::new();
            let mut position = Position::default();
            scheduler.set_path([Position::new(3.0, 0.0, 0.0)]);

            arbitrate_movement(Some(MovementOverride::Sleep), state, &mut scheduler, &mut position);

            assert!(scheduler.pathing_suspended);
            assert!(!scheduler.has_path());
            assert_eq!(scheduler.ticks_delivered, 0);
            assert_eq!(scheduler.task_updates, 0);
            assert_eq!(position, Position::default());
        }
    }

    #[test]
    fn test_stay_runs_hook_and_clears_path() {
        let mut scheduler = TaskScheduler::new();
        let mut position = Position::default();
        scheduler.set_path([Position::new(3.0, 0.0, 0.0)]);

        arbitrate_movement(None, MovementState::Stay, &mut scheduler, &mut position);

        assert_eq!(scheduler.task_updates, 1);
        assert_eq!(scheduler.ticks_delivered, 0);
        assert!(!scheduler.has_path());
        assert_eq!(position, Position::default());
    }

    #[test]
    fn test_waking_resumes_pathing() {
        let mut scheduler = TaskScheduler::new();
        let mut position = Position::default();
        arbitrate_movement(Some(MovementOverride::Sleep), MovementState::Move, &mut scheduler, &mut position);

        scheduler.set_path([Position::new(1.0, 0.0, 0.0)]);
        arbitrate_movement(None, MovementState::Move, &mut scheduler, &mut position);
        assert!(!scheduler.pathing_suspended);
        assert_eq!(position.x, 1.0);
    }

    #[test]
    fn test_pursuit_follows_movement_state() {
        let pursue = Some(MovementOverride::Pursue(PartyId::new_v4()));

        let mut scheduler = TaskScheduler::new();
        let mut position = Position::default();
        scheduler.set_path([Position::new(2.0, 0.0, 0.0)]);
        arbitrate_movement(pursue, MovementState::Stay, &mut scheduler, &mut position);
        assert_eq!(position, Position::default());
        assert_eq!(scheduler.ticks_delivered, 0);
        assert!(!scheduler.has_path());

        scheduler.set_path([Position::new(2.0, 0.0, 0.0)]);
        arbitrate_movement(pursue, MovementState::Follow, &mut scheduler, &mut position);
        assert_eq!(position.x, 2.0);
    }
}
