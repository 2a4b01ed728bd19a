//! Error Types
//!
//! Only caller-input errors surface from the core. Anomalies such as an
//! unresolvable partner degrade to a safe local state instead.

use thiserror::Error;
use villager_events::PartyId;

use crate::actions::ActionKind;

#[derive(Debug, Error)]
pub enum VillagerError {
    /// The caller passed something the operation cannot act on
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The requested action capability is not registered on this villager
    #[error("action `{}` is not registered", .0.capability_id())]
    NotFound(ActionKind),
    /// A referenced partner or party could not be resolved
    #[error("party {0} could not be resolved")]
    AbsentTarget(PartyId),
    /// A persisted section could not be decoded
    #[error("malformed `{section}` section: {source}")]
    Persistence {
        section: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T, E = VillagerError> = std::result::Result<T, E>;
