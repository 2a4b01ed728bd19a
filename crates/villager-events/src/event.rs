//! Event Types
//!
//! Records emitted by the villager core. Serialized one per line into the
//! JSONL event log.

use serde::{Deserialize, Serialize};

use crate::ids::PartyId;

/// Primary event type categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Marriage,
    Combat,
    Sleep,
    Mood,
    Item,
    Death,
    Speech,
    Interaction,
}

impl EventType {
    /// Returns all event type variants.
    pub fn all() -> &'static [EventType] {
        &[
            EventType::Marriage,
            EventType::Combat,
            EventType::Sleep,
            EventType::Mood,
            EventType::Item,
            EventType::Death,
            EventType::Speech,
            EventType::Interaction,
        ]
    }
}

/// What happened, with its payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventKind {
    MarriedToVillager { partner: PartyId },
    MarriedToPlayer { partner: PartyId },
    MarriageEnded { former_partner: PartyId },
    StaleMarriageRepaired { former_partner: PartyId },
    Damaged { amount: f32, originator: Option<PartyId>, health: f32 },
    AttackResponseStarted { originator: PartyId },
    FellAsleep,
    WokeUp,
    MoodChanged { delta: f32, level: f32 },
    ItemDropped { slot: usize, item: String, count: u32 },
    Died { cause: String },
    DeathNotified { recipient: PartyId },
    MessageSent { recipient: PartyId, text: String },
    InventoryOpened { player: PartyId },
    ScreenOpened { player: PartyId, screen: String },
    CapturedInMemorial { player: PartyId },
    InfectionCured,
}

impl EventKind {
    pub fn event_type(&self) -> EventType {
        match self {
            EventKind::MarriedToVillager { .. }
            | EventKind::MarriedToPlayer { .. }
            | EventKind::MarriageEnded { .. }
            | EventKind::StaleMarriageRepaired { .. } => EventType::Marriage,
            EventKind::Damaged { .. } | EventKind::AttackResponseStarted { .. } => {
                EventType::Combat
            }
            EventKind::FellAsleep | EventKind::WokeUp => EventType::Sleep,
            EventKind::MoodChanged { .. } => EventType::Mood,
            EventKind::ItemDropped { .. } => EventType::Item,
            EventKind::Died { .. } | EventKind::DeathNotified { .. } => EventType::Death,
            EventKind::MessageSent { .. } => EventType::Speech,
            EventKind::InventoryOpened { .. }
            | EventKind::ScreenOpened { .. }
            | EventKind::CapturedInMemorial { .. }
            | EventKind::InfectionCured => EventType::Interaction,
        }
    }
}

/// A single logged event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VillagerEvent {
    pub event_id: String,
    pub tick: u64,
    /// The villager the event happened to
    pub villager: PartyId,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl VillagerEvent {
    pub fn event_type(&self) -> EventType {
        self.kind.event_type()
    }
}
