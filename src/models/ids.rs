//! Strongly-typed identifier for emitted transfers
//!
//! Transfer IDs are name-based (UUID v5) so that redistributing the same
//! calendar with the same spending yields byte-identical ledgers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

const DISPLAY_PREFIX: &str = "xfr-";

/// Namespace for transfer IDs (a fixed random UUID)
const TRANSFER_NAMESPACE: Uuid = Uuid::from_u128(0x6f1c_2a8e_5b7d_4c39_9e04_d1a3_7b52_c860);

/// Identifier of a single [`Transfer`](super::Transfer) record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransferId(Uuid);

impl TransferId {
    /// Derive an ID deterministically from a canonical description of the
    /// transfer
    pub fn derive(name: &str) -> Self {
        Self(Uuid::new_v5(&TRANSFER_NAMESPACE, name.as_bytes()))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Parse an ID from a full UUID string, with or without the display prefix
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        let s = s.strip_prefix(DISPLAY_PREFIX).unwrap_or(s);
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl fmt::Display for TransferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", DISPLAY_PREFIX, &self.0.to_string()[..8])
    }
}

impl From<Uuid> for TransferId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl FromStr for TransferId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
