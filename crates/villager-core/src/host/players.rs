//! External Players
//!
//! Players are owned by the host. The core sees two things: the persisted
//! per-player record (authoritative even while no villager is loaded) and the
//! set of currently connected sessions it can message.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use villager_events::{Gender, MaritalStatus, PartyId};

use crate::components::Position;

/// Persisted relationship data of a player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerRecord {
    pub id: PartyId,
    pub name: String,
    pub gender: Gender,
    pub marital_status: MaritalStatus,
    pub spouse_name: String,
    pub spouse_gender: Gender,
}

impl Default for PlayerRecord {
    fn default() -> Self {
        Self::new(PartyId::default(), "", Gender::Unassigned)
    }
}

impl PlayerRecord {
    pub fn new(id: PartyId, name: impl Into<String>, gender: Gender) -> Self {
        Self {
            id,
            name: name.into(),
            gender,
            marital_status: MaritalStatus::Unmarried,
            spouse_name: String::new(),
            spouse_gender: Gender::Unassigned,
        }
    }

    pub fn set_married(&mut self, status: MaritalStatus, spouse_name: impl Into<String>, spouse_gender: Gender) {
        self.marital_status = status;
        self.spouse_name = spouse_name.into();
        self.spouse_gender = spouse_gender;
    }

    pub fn reset_marriage(&mut self) {
        self.marital_status = MaritalStatus::Unmarried;
        self.spouse_name.clear();
        self.spouse_gender = Gender::Unassigned;
    }
}

/// Resource: persisted player records by id
#[derive(Resource, Debug, Default)]
pub struct PlayerRecords {
    records: HashMap<PartyId, PlayerRecord>,
}

impl PlayerRecords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: PlayerRecord) {
        self.records.insert(record.id, record);
    }

    pub fn get(&self, id: PartyId) -> Option<&PlayerRecord> {
        self.records.get(&id)
    }

    pub fn get_mut(&mut self, id: PartyId) -> Option<&mut PlayerRecord> {
        self.records.get_mut(&id)
    }
}

/// Screens a villager can ask the host to open for a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Interact,
    Editor,
    Inventory,
}

impl Screen {
    pub fn as_str(self) -> &'static str {
        match self {
            Screen::Interact => "interact",
            Screen::Editor => "editor",
            Screen::Inventory => "inventory",
        }
    }
}

/// A connected player
#[derive(Debug, Clone)]
pub struct Session {
    pub player_id: PartyId,
    pub name: String,
    pub position: Position,
    pub creative: bool,
    /// Messages delivered to this player, oldest first
    pub inbox: Vec<String>,
    pub opened_screens: Vec<Screen>,
}

impl Session {
    pub fn new(player_id: PartyId, name: impl Into<String>, position: Position) -> Self {
        Self {
            player_id,
            name: name.into(),
            position,
            creative: false,
            inbox: Vec::new(),
            opened_screens: Vec::new(),
        }
    }
}

/// Resource: currently connected players
#[derive(Resource, Debug, Default)]
pub struct Sessions {
    sessions: HashMap<PartyId, Session>,
}

impl Sessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&mut self, session: Session) {
        self.sessions.insert(session.player_id, session);
    }

    pub fn disconnect(&mut self, player: PartyId) -> Option<Session> {
        self.sessions.remove(&player)
    }

    pub fn is_online(&self, player: PartyId) -> bool {
        self.sessions.contains_key(&player)
    }

    pub fn get(&self, player: PartyId) -> Option<&Session> {
        self.sessions.get(&player)
    }

    /// Deliver text to a player. Returns false if the player is not reachable.
    pub fn send_message(&mut self, player: PartyId, text: impl Into<String>) -> bool {
        match self.sessions.get_mut(&player) {
            Some(session) => {
                session.inbox.push(text.into());
                true
            }
            None => false,
        }
    }

    pub fn open_screen(&mut self, player: PartyId, screen: Screen) -> bool {
        match self.sessions.get_mut(&player) {
            Some(session) => {
                session.opened_screens.push(screen);
                true
            }
            None => false,
        }
    }

    /// Closest connected player within `radius` of `position`
    pub fn closest_within(&self, position: &Position, radius: f64) -> Option<PartyId> {
        self.sessions
            .values()
            .filter(|s| s.position.within(position, radius))
            .min_by(|a, b| {
                a.position
                    .distance_sq(position)
                    .partial_cmp(&b.position.distance_sq(position))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|s| s.player_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_to_offline_player_is_dropped() {
        let mut sessions = Sessions::new();
        assert!(!sessions.send_message(PartyId::new_v4(), "hello"));
    }

    #[test]
    fn test_closest_within_radius() {
        let near = PartyId::new_v4();
        let far = PartyId::new_v4();
        let mut sessions = Sessions::new();
        sessions.connect(Session::new(near, "Near", Position::new(3.0, 0.0, 0.0)));
        sessions.connect(Session::new(far, "Far", Position::new(30.0, 0.0, 0.0)));

        let origin = Position::default();
        assert_eq!(sessions.closest_within(&origin, 10.0), Some(near));
        assert_eq!(sessions.closest_within(&Position::new(100.0, 0.0, 0.0), 10.0), None);
    }

    #[test]
    fn test_player_record_reset() {
        let mut record = PlayerRecord::new(PartyId::new_v4(), "Steve", Gender::Male);
        record.set_married(MaritalStatus::MarriedToVillager(PartyId::new_v4()), "Aldo", Gender::Male);
        record.reset_marriage();
        assert_eq!(record.marital_status, MaritalStatus::Unmarried);
        assert!(record.spouse_name.is_empty());
    }
}
