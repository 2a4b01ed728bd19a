//! Spawn Data Codec
//!
//! The minimal set of attributes a client needs to render and identify a
//! villager, written once when the villager spawns.
//!
//! # Wire layout
//!
//! All integers are big-endian. Strings are a `u16` byte length followed by
//! UTF-8. Field order is fixed; the reader consumes exactly what the writer
//! produced, in the same order:
//!
//! | # | field          | encoding                                |
//! |---|----------------|-----------------------------------------|
//! | 1 | id             | 16 bytes                                |
//! | 2 | name           | string                                  |
//! | 3 | gender         | u8                                      |
//! | 4 | profession     | u8                                      |
//! | 5 | movement state | u8                                      |
//! | 6 | baby state     | u8                                      |
//! | 7 | infected       | u8 (0/1)                                |
//! | 8 | marital tag    | u8 (0 unmarried, 1 villager, 2 player)  |
//! | 9 | partner id     | 16 bytes, nil when unmarried            |
//! |10 | partner name   | string                                  |
//! |11 | partner gender | u8                                      |
//! |12 | sleeping skin  | u8 (0/1)                                |

use thiserror::Error;

use crate::ids::PartyId;
use crate::kinds::{BabyState, Gender, MaritalStatus, MovementState, Profession};

/// Errors produced while decoding spawn data
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpawnDataError {
    #[error("spawn data ended early while reading {field}")]
    UnexpectedEof { field: &'static str },
    #[error("spawn data field {field} is not valid UTF-8")]
    InvalidUtf8 { field: &'static str },
    #[error("unknown value {value} for spawn data field {field}")]
    UnknownDiscriminant { field: &'static str, value: u8 },
    #[error("string field {field} is {len} bytes, longer than the u16 limit")]
    StringTooLong { field: &'static str, len: usize },
}

/// Spawn-time snapshot of a villager
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnData {
    pub id: PartyId,
    pub name: String,
    pub gender: Gender,
    pub profession: Profession,
    pub movement_state: MovementState,
    pub baby_state: BabyState,
    pub infected: bool,
    pub marital_status: MaritalStatus,
    pub partner_name: String,
    pub partner_gender: Gender,
    pub sleeping_skin: bool,
}

impl SpawnData {
    /// Append the encoded form to `buf`.
    pub fn write(&self, buf: &mut Vec<u8>) -> Result<(), SpawnDataError> {
        buf.extend_from_slice(self.id.as_bytes());
        write_string(buf, "name", &self.name)?;
        buf.push(self.gender.id());
        buf.push(self.profession.id());
        buf.push(self.movement_state.id());
        buf.push(self.baby_state.id());
        buf.push(u8::from(self.infected));
        buf.push(self.marital_status.wire_tag());
        buf.extend_from_slice(self.marital_status.partner_id().as_bytes());
        write_string(buf, "partner_name", &self.partner_name)?;
        buf.push(self.partner_gender.id());
        buf.push(u8::from(self.sleeping_skin));
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SpawnDataError> {
        let mut buf = Vec::with_capacity(64);
        self.write(&mut buf)?;
        Ok(buf)
    }

    /// Decode from the front of `bytes`, returning the data and the number of
    /// bytes consumed.
    pub fn read(bytes: &[u8]) -> Result<(Self, usize), SpawnDataError> {
        let mut reader = Reader { bytes, pos: 0 };

        let id = PartyId::from_bytes(reader.array("id")?);
        let name = reader.string("name")?;
        let gender = decode(reader.u8("gender")?, "gender", Gender::from_id)?;
        let profession = decode(reader.u8("profession")?, "profession", Profession::from_id)?;
        let movement_state =
            decode(reader.u8("movement_state")?, "movement_state", MovementState::from_id)?;
        let baby_state = decode(reader.u8("baby_state")?, "baby_state", BabyState::from_id)?;
        let infected = reader.flag("infected")?;
        let marital_tag = reader.u8("marital_tag")?;
        let partner = PartyId::from_bytes(reader.array("partner_id")?);
        let marital_status = MaritalStatus::from_wire(marital_tag, partner).ok_or(
            SpawnDataError::UnknownDiscriminant {
                field: "marital_tag",
                value: marital_tag,
            },
        )?;
        let partner_name = reader.string("partner_name")?;
        let partner_gender = decode(reader.u8("partner_gender")?, "partner_gender", Gender::from_id)?;
        let sleeping_skin = reader.flag("sleeping_skin")?;

        let data = Self {
            id,
            name,
            gender,
            profession,
            movement_state,
            baby_state,
            infected,
            marital_status,
            partner_name,
            partner_gender,
            sleeping_skin,
        };
        Ok((data, reader.pos))
    }
}

fn write_string(buf: &mut Vec<u8>, field: &'static str, value: &str) -> Result<(), SpawnDataError> {
    let len = u16::try_from(value.len()).map_err(|_| SpawnDataError::StringTooLong {
        field,
        len: value.len(),
    })?;
    buf.extend_from_slice(&len.to_be_bytes());
    buf.extend_from_slice(value.as_bytes());
    Ok(())
}

fn decode<T>(value: u8, field: &'static str, f: impl Fn(u8) -> Option<T>) -> Result<T, SpawnDataError> {
    f(value).ok_or(SpawnDataError::UnknownDiscriminant { field, value })
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, field: &'static str, len: usize) -> Result<&'a [u8], SpawnDataError> {
        let end = self.pos + len;
        let slice = self
            .bytes
            .get(self.pos..end)
            .ok_or(SpawnDataError::UnexpectedEof { field })?;
        self.pos = end;
        Ok(slice)
    }

    fn u8(&mut self, field: &'static str) -> Result<u8, SpawnDataError> {
        Ok(self.take(field, 1)?[0])
    }

    fn flag(&mut self, field: &'static str) -> Result<bool, SpawnDataError> {
        match self.u8(field)? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(SpawnDataError::UnknownDiscriminant { field, value }),
        }
    }

    fn array(&mut self, field: &'static str) -> Result<[u8; 16], SpawnDataError> {
        let mut out = [0u8; 16];
        out.copy_from_slice(self.take(field, 16)?);
        Ok(out)
    }

    fn string(&mut self, field: &'static str) -> Result<String, SpawnDataError> {
        let len_bytes = self.take(field, 2)?;
        let len = u16::from_be_bytes([len_bytes[0], len_bytes[1]]) as usize;
        let raw = self.take(field, len)?;
        String::from_utf8(raw.to_vec()).map_err(|_| SpawnDataError::InvalidUtf8 { field })
    }
}
