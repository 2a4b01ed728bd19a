//! Domain Enumerations
//!
//! Closed sets of villager states. Each enum that travels over the wire has a
//! stable numeric id; ids are part of the spawn-data contract and must never
//! be reordered.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::{PartyId, EMPTY_ID};

/// Gender of a villager or player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    #[default]
    Unassigned,
    Male,
    Female,
}

impl Gender {
    pub fn id(self) -> u8 {
        match self {
            Gender::Unassigned => 0,
            Gender::Male => 1,
            Gender::Female => 2,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Gender::Unassigned),
            1 => Some(Gender::Male),
            2 => Some(Gender::Female),
            _ => None,
        }
    }
}

/// Texture family shared by related professions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfessionSkinGroup {
    #[default]
    Unassigned,
    Farmer,
    Librarian,
    Priest,
    Smith,
    Butcher,
    Guard,
    Child,
}

/// A villager's profession
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profession {
    #[default]
    Nitwit,
    Farmer,
    Fisherman,
    Librarian,
    Priest,
    Smith,
    Miner,
    Butcher,
    Baker,
    Guard,
    Archer,
    Warrior,
    Child,
}

impl Profession {
    pub fn all() -> &'static [Profession] {
        &[
            Profession::Nitwit,
            Profession::Farmer,
            Profession::Fisherman,
            Profession::Librarian,
            Profession::Priest,
            Profession::Smith,
            Profession::Miner,
            Profession::Butcher,
            Profession::Baker,
            Profession::Guard,
            Profession::Archer,
            Profession::Warrior,
            Profession::Child,
        ]
    }

    pub fn id(self) -> u8 {
        match self {
            Profession::Nitwit => 0,
            Profession::Farmer => 1,
            Profession::Fisherman => 2,
            Profession::Librarian => 3,
            Profession::Priest => 4,
            Profession::Smith => 5,
            Profession::Miner => 6,
            Profession::Butcher => 7,
            Profession::Baker => 8,
            Profession::Guard => 9,
            Profession::Archer => 10,
            Profession::Warrior => 11,
            Profession::Child => 12,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::all().iter().copied().find(|p| p.id() == id)
    }

    /// Default skin group; the profession table may override it.
    pub fn default_skin_group(self) -> ProfessionSkinGroup {
        match self {
            Profession::Nitwit => ProfessionSkinGroup::Unassigned,
            Profession::Farmer | Profession::Fisherman => ProfessionSkinGroup::Farmer,
            Profession::Librarian => ProfessionSkinGroup::Librarian,
            Profession::Priest => ProfessionSkinGroup::Priest,
            Profession::Smith | Profession::Miner => ProfessionSkinGroup::Smith,
            Profession::Butcher | Profession::Baker => ProfessionSkinGroup::Butcher,
            Profession::Guard | Profession::Archer | Profession::Warrior => {
                ProfessionSkinGroup::Guard
            }
            Profession::Child => ProfessionSkinGroup::Child,
        }
    }
}

impl fmt::Display for Profession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Profession::Nitwit => "Nitwit",
            Profession::Farmer => "Farmer",
            Profession::Fisherman => "Fisherman",
            Profession::Librarian => "Librarian",
            Profession::Priest => "Priest",
            Profession::Smith => "Smith",
            Profession::Miner => "Miner",
            Profession::Butcher => "Butcher",
            Profession::Baker => "Baker",
            Profession::Guard => "Guard",
            Profession::Archer => "Archer",
            Profession::Warrior => "Warrior",
            Profession::Child => "Child",
        };
        write!(f, "{}", name)
    }
}

/// Whether the villager roams, follows a player, or holds position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementState {
    #[default]
    Move,
    Follow,
    Stay,
}

impl MovementState {
    pub fn id(self) -> u8 {
        match self {
            MovementState::Move => 0,
            MovementState::Follow => 1,
            MovementState::Stay => 2,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(MovementState::Move),
            1 => Some(MovementState::Follow),
            2 => Some(MovementState::Stay),
            _ => None,
        }
    }
}

/// Baby currently carried by the villager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BabyState {
    #[default]
    None,
    Male,
    Female,
}

impl BabyState {
    pub fn id(self) -> u8 {
        match self {
            BabyState::None => 0,
            BabyState::Male => 1,
            BabyState::Female => 2,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(BabyState::None),
            1 => Some(BabyState::Male),
            2 => Some(BabyState::Female),
            _ => None,
        }
    }
}

/// Marital status of a relationship holder.
///
/// The partner id is carried by the variant, so "married to nobody" cannot be
/// represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "partner", rename_all = "snake_case")]
pub enum MaritalStatus {
    #[default]
    Unmarried,
    MarriedToVillager(PartyId),
    MarriedToPlayer(PartyId),
}

impl MaritalStatus {
    /// Partner id, or [`EMPTY_ID`] when unmarried.
    pub fn partner_id(&self) -> PartyId {
        match self {
            MaritalStatus::Unmarried => EMPTY_ID,
            MaritalStatus::MarriedToVillager(id) | MaritalStatus::MarriedToPlayer(id) => *id,
        }
    }

    pub fn is_married(&self) -> bool {
        !matches!(self, MaritalStatus::Unmarried)
    }

    pub fn is_married_to(&self, party: PartyId) -> bool {
        self.is_married() && self.partner_id() == party
    }

    /// Wire tag: 0 unmarried, 1 villager, 2 player
    pub fn wire_tag(&self) -> u8 {
        match self {
            MaritalStatus::Unmarried => 0,
            MaritalStatus::MarriedToVillager(_) => 1,
            MaritalStatus::MarriedToPlayer(_) => 2,
        }
    }

    pub fn from_wire(tag: u8, partner: PartyId) -> Option<Self> {
        match tag {
            0 => Some(MaritalStatus::Unmarried),
            1 => Some(MaritalStatus::MarriedToVillager(partner)),
            2 => Some(MaritalStatus::MarriedToPlayer(partner)),
            _ => None,
        }
    }
}

/// How a villager classifies a remembered party
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    #[default]
    Stranger,
    Acquaintance,
    Friend,
    Spouse,
    Parent,
}

impl Relation {
    /// Stable id written into memorial items
    pub fn id(self) -> u8 {
        match self {
            Relation::Stranger => 0,
            Relation::Acquaintance => 1,
            Relation::Friend => 2,
            Relation::Spouse => 3,
            Relation::Parent => 4,
        }
    }

    /// Family relations are not overwritten by heart-based promotion
    pub fn is_family(self) -> bool {
        matches!(self, Relation::Spouse | Relation::Parent)
    }
}

/// Equipment slots exposed to the host renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentSlot {
    Head,
    Chest,
    Legs,
    Feet,
    MainHand,
    OffHand,
}

impl EquipmentSlot {
    /// Inventory slot backing an armor slot (36-39), `None` for hands
    pub fn inventory_slot(self) -> Option<usize> {
        match self {
            EquipmentSlot::Head => Some(36),
            EquipmentSlot::Chest => Some(37),
            EquipmentSlot::Legs => Some(38),
            EquipmentSlot::Feet => Some(39),
            EquipmentSlot::MainHand | EquipmentSlot::OffHand => None,
        }
    }
}
