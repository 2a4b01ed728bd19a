//! Action Registry
//!
//! The closed set of villager behaviors, held in a fixed table indexed by
//! [`ActionKind`]. Actions tick in registration order and each owns its own
//! serializable state; they reach shared villager state only through the
//! [`Attributes`] setters handed to them in [`ActionContext`].

pub mod attack_response;
pub mod chore;
pub mod combat;
pub mod mood;
pub mod sleep;

pub use attack_response::AttackResponseAction;
pub use chore::{ChoreAction, ChoreKind};
pub use combat::{CombatAction, CombatMethod};
pub use mood::{MoodAction, MoodLabel};
pub use sleep::SleepAction;

use bevy_ecs::prelude::*;
use serde_json::Value;
use std::collections::BTreeMap;
use villager_events::{EventKind, PartyId};

use crate::components::{Attributes, Inventory};
use crate::config::Config;
use crate::error::{Result, VillagerError};
use crate::registry::ItemRegistry;

/// Capability key of an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionKind {
    Sleep,
    Mood,
    Chore,
    AttackResponse,
    Combat,
}

impl ActionKind {
    pub const COUNT: usize = 5;

    pub fn all() -> [ActionKind; Self::COUNT] {
        [
            ActionKind::Sleep,
            ActionKind::Mood,
            ActionKind::Chore,
            ActionKind::AttackResponse,
            ActionKind::Combat,
        ]
    }

    fn index(self) -> usize {
        match self {
            ActionKind::Sleep => 0,
            ActionKind::Mood => 1,
            ActionKind::Chore => 2,
            ActionKind::AttackResponse => 3,
            ActionKind::Combat => 4,
        }
    }

    /// Key of this action's section in saved data
    pub fn capability_id(self) -> &'static str {
        match self {
            ActionKind::Sleep => "sleep",
            ActionKind::Mood => "mood",
            ActionKind::Chore => "chore",
            ActionKind::AttackResponse => "attack_response",
            ActionKind::Combat => "combat",
        }
    }

    pub fn from_capability_id(id: &str) -> Option<Self> {
        Self::all().into_iter().find(|k| k.capability_id() == id)
    }
}

/// Lifecycle notifications broadcast to every action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionHook {
    Say,
    MarriedToVillager,
    MarriedToPlayer,
    MarriageEnded,
}

/// An action's claim on the villager's movement for this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementOverride {
    /// Asleep: the host scheduler gets nothing
    Sleep,
    /// Chasing whoever attacked us
    Pursue(PartyId),
}

/// Everything an action may see or touch during its tick
pub struct ActionContext<'a> {
    pub tick: u64,
    pub is_night: bool,
    pub attributes: &'a mut Attributes,
    pub inventory: &'a Inventory,
    pub items: &'a ItemRegistry,
    pub config: &'a Config,
    /// Events raised during the tick, logged by the caller
    pub events: Vec<EventKind>,
}

/// One concrete behavior
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Sleep(SleepAction),
    Mood(MoodAction),
    Chore(ChoreAction),
    AttackResponse(AttackResponseAction),
    Combat(CombatAction),
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Sleep(_) => ActionKind::Sleep,
            Action::Mood(_) => ActionKind::Mood,
            Action::Chore(_) => ActionKind::Chore,
            Action::AttackResponse(_) => ActionKind::AttackResponse,
            Action::Combat(_) => ActionKind::Combat,
        }
    }

    /// The action in its rest state
    pub fn rest(kind: ActionKind) -> Self {
        match kind {
            ActionKind::Sleep => Action::Sleep(SleepAction::default()),
            ActionKind::Mood => Action::Mood(MoodAction::default()),
            ActionKind::Chore => Action::Chore(ChoreAction::default()),
            ActionKind::AttackResponse => Action::AttackResponse(AttackResponseAction::default()),
            ActionKind::Combat => Action::Combat(CombatAction::default()),
        }
    }

    pub fn tick(&mut self, ctx: &mut ActionContext) {
        match self {
            Action::Sleep(a) => a.tick(ctx),
            Action::Mood(a) => a.tick(ctx),
            Action::Chore(a) => a.tick(ctx),
            Action::AttackResponse(a) => a.tick(ctx),
            Action::Combat(a) => a.tick(ctx),
        }
    }

    pub fn on_hook(&mut self, hook: ActionHook, config: &Config) {
        match self {
            Action::Mood(a) => a.on_hook(hook, config),
            Action::Combat(a) => a.on_hook(hook),
            Action::Sleep(_) | Action::Chore(_) | Action::AttackResponse(_) => {}
        }
    }

    pub fn is_toggle(&self) -> bool {
        matches!(self, Action::Chore(_))
    }

    fn disable(&mut self) {
        if let Action::Chore(a) = self {
            a.disable();
        }
    }

    fn movement_override(&self) -> Option<MovementOverride> {
        match self {
            Action::Sleep(a) if a.is_sleeping() => Some(MovementOverride::Sleep),
            Action::AttackResponse(a) => a.target().map(MovementOverride::Pursue),
            _ => None,
        }
    }

    fn to_value(&self) -> serde_json::Result<Value> {
        match self {
            Action::Sleep(a) => serde_json::to_value(a),
            Action::Mood(a) => serde_json::to_value(a),
            Action::Chore(a) => serde_json::to_value(a),
            Action::AttackResponse(a) => serde_json::to_value(a),
            Action::Combat(a) => serde_json::to_value(a),
        }
    }

    fn from_value(kind: ActionKind, value: Value) -> serde_json::Result<Self> {
        Ok(match kind {
            ActionKind::Sleep => Action::Sleep(serde_json::from_value(value)?),
            ActionKind::Mood => Action::Mood(serde_json::from_value(value)?),
            ActionKind::Chore => Action::Chore(serde_json::from_value(value)?),
            ActionKind::AttackResponse => Action::AttackResponse(serde_json::from_value(value)?),
            ActionKind::Combat => Action::Combat(serde_json::from_value(value)?),
        })
    }
}

macro_rules! typed_accessors {
    ($($get:ident, $get_mut:ident, $variant:ident, $ty:ty;)*) => {
        $(
            pub fn $get(&self) -> Result<&$ty> {
                match self.get(ActionKind::$variant)? {
                    Action::$variant(a) => Ok(a),
                    _ => Err(VillagerError::NotFound(ActionKind::$variant)),
                }
            }

            pub fn $get_mut(&mut self) -> Result<&mut $ty> {
                match self.get_mut(ActionKind::$variant)? {
                    Action::$variant(a) => Ok(a),
                    _ => Err(VillagerError::NotFound(ActionKind::$variant)),
                }
            }
        )*
    };
}

/// Component: the actions registered on a villager
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct ActionRegistry {
    slots: [Option<Action>; ActionKind::COUNT],
    order: Vec<ActionKind>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep, mood, chore, attack response, combat, in that tick order
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for kind in ActionKind::all() {
            registry.register(Action::rest(kind));
        }
        registry
    }

    /// Register an action. Re-registering a kind replaces the instance and
    /// keeps its original tick position.
    pub fn register(&mut self, action: Action) {
        let kind = action.kind();
        if !self.order.contains(&kind) {
            self.order.push(kind);
        }
        self.slots[kind.index()] = Some(action);
    }

    pub fn is_registered(&self, kind: ActionKind) -> bool {
        self.slots[kind.index()].is_some()
    }

    pub fn get(&self, kind: ActionKind) -> Result<&Action> {
        self.slots[kind.index()]
            .as_ref()
            .ok_or(VillagerError::NotFound(kind))
    }

    pub fn get_mut(&mut self, kind: ActionKind) -> Result<&mut Action> {
        self.slots[kind.index()]
            .as_mut()
            .ok_or(VillagerError::NotFound(kind))
    }

    typed_accessors! {
        sleep, sleep_mut, Sleep, SleepAction;
        mood, mood_mut, Mood, MoodAction;
        chore, chore_mut, Chore, ChoreAction;
        attack_response, attack_response_mut, AttackResponse, AttackResponseAction;
        combat, combat_mut, Combat, CombatAction;
    }

    /// Registration order
    pub fn order(&self) -> &[ActionKind] {
        &self.order
    }

    pub fn for_each_mut(&mut self, mut f: impl FnMut(&mut Action)) {
        for kind in &self.order {
            if let Some(action) = self.slots[kind.index()].as_mut() {
                f(action);
            }
        }
    }

    pub fn tick_all(&mut self, ctx: &mut ActionContext) {
        self.for_each_mut(|action| action.tick(ctx));
    }

    pub fn broadcast(&mut self, hook: ActionHook, config: &Config) {
        self.for_each_mut(|action| action.on_hook(hook, config));
    }

    pub fn disable_all_toggles(&mut self) {
        self.for_each_mut(|action| {
            if action.is_toggle() {
                action.disable();
            }
        });
    }

    /// First claim in registration order wins
    pub fn movement_override(&self) -> Option<MovementOverride> {
        self.order
            .iter()
            .filter_map(|kind| self.slots[kind.index()].as_ref())
            .find_map(Action::movement_override)
    }

    /// True while the sleep action (if any) is asleep
    pub fn is_sleeping(&self) -> bool {
        self.sleep().map(SleepAction::is_sleeping).unwrap_or(false)
    }

    /// One section per registered action, keyed by capability id
    pub fn to_sections(&self) -> Result<BTreeMap<String, Value>> {
        let mut sections = BTreeMap::new();
        for kind in &self.order {
            if let Some(action) = &self.slots[kind.index()] {
                let value = action.to_value().map_err(|source| VillagerError::Persistence {
                    section: kind.capability_id(),
                    source,
                })?;
                sections.insert(kind.capability_id().to_string(), value);
            }
        }
        Ok(sections)
    }

    /// Restore registered actions from saved sections. Actions without a
    /// section keep their current (freshly registered, resting) state;
    /// sections for unregistered or unknown capabilities are ignored.
    pub fn load_sections(&mut self, sections: &BTreeMap<String, Value>) -> Result<()> {
        for kind in &self.order {
            let Some(value) = sections.get(kind.capability_id()) else {
                continue;
            };
            let action = Action::from_value(*kind, value.clone()).map_err(|source| {
                VillagerError::Persistence {
                    section: kind.capability_id(),
                    source,
                }
            })?;
            self.slots[kind.index()] = Some(action);
        }
        Ok(())
    }
}
