//! Speech
//!
//! Villager chat addressed to a player: an optional server prefix, the
//! villager's title as seen by that player, then the phrase.

use bevy_ecs::prelude::*;
use rand::Rng;
use villager_events::{EventKind, Gender, PartyId};

use crate::actions::ActionHook;
use crate::components::{Attributes, RelationshipState};
use crate::config::Config;
use crate::error::Result;
use crate::host::{Localizer, PlayerRecords, Sessions};
use crate::SimRng;

use super::{broadcast_hook, record_event, villager_id};

const MOAN_COUNT: u32 = 3;

fn gender_key(gender: Gender) -> &'static str {
    match gender {
        Gender::Male => "male",
        Gender::Female => "female",
        Gender::Unassigned => "unassigned",
    }
}

/// How `viewer` addresses the villager: spouse, child, or name and profession
pub fn title_for(world: &World, entity: Entity, viewer: PartyId) -> String {
    let localizer = world.resource::<Localizer>();
    let Some(attributes) = world.get::<Attributes>(entity) else {
        return String::new();
    };
    let relationship = world.get::<RelationshipState>(entity);

    let key = if relationship.is_some_and(|r| r.marital_status().is_married_to(viewer)) {
        format!("title.spouse.{}", gender_key(attributes.gender))
    } else if relationship.is_some_and(|r| r.is_parent(viewer)) {
        format!("title.child.{}", gender_key(attributes.gender))
    } else {
        "title.default".to_string()
    };

    let profession = attributes.profession.to_string();
    localizer.format(&key, &[attributes.name.as_str(), profession.as_str()])
}

fn chat_prefix(config: &Config) -> &str {
    match config.villager.chat_prefix.as_str() {
        "null" => "",
        prefix => prefix,
    }
}

fn party_name(world: &World, party: PartyId) -> String {
    world
        .resource::<Sessions>()
        .get(party)
        .map(|session| session.name.clone())
        .or_else(|| world.resource::<PlayerRecords>().get(party).map(|r| r.name.clone()))
        .unwrap_or_default()
}

fn deliver(world: &mut World, entity: Entity, id: PartyId, target: PartyId, text: String) -> bool {
    let sent = world.resource_mut::<Sessions>().send_message(target, text.as_str());
    if sent {
        record_event(world, id, EventKind::MessageSent { recipient: target, text });
    } else {
        tracing::trace!("Villager {} spoke to unreachable party {}", id, target);
    }
    broadcast_hook(world, entity, ActionHook::Say);
    sent
}

/// Say a localized phrase to a player. `{0}` is the villager's name, `{1}`
/// the player's, and `args` fill `{2}` onwards. Infected villagers moan
/// instead. Returns true if the player was reachable.
pub fn say(world: &mut World, entity: Entity, phrase_key: &str, target: PartyId, args: &[&str]) -> Result<bool> {
    let id = villager_id(world, entity)?;
    let infected = world.get::<Attributes>(entity).is_some_and(|a| a.infected);

    let phrase = if infected {
        let moan = world.resource_mut::<SimRng>().0.gen_range(0..MOAN_COUNT);
        world.resource::<Localizer>().format(&format!("moan.{}", moan), &[])
    } else {
        let name = world.get::<Attributes>(entity).map(|a| a.name.clone()).unwrap_or_default();
        let target_name = party_name(world, target);
        let mut all_args = vec![name.as_str(), target_name.as_str()];
        all_args.extend_from_slice(args);
        world.resource::<Localizer>().format(phrase_key, &all_args)
    };

    let text = format!(
        "{}{}: {}",
        chat_prefix(world.resource::<Config>()),
        title_for(world, entity, target),
        phrase
    );
    Ok(deliver(world, entity, id, target, text))
}

/// Say text as-is, without localization
pub fn say_raw(world: &mut World, entity: Entity, target: PartyId, text: &str) -> Result<bool> {
    let id = villager_id(world, entity)?;
    let line = format!(
        "{}{}: {}",
        chat_prefix(world.resource::<Config>()),
        title_for(world, entity, target),
        text
    );
    Ok(deliver(world, entity, id, target, line))
}
