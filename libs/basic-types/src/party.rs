//! A party id abstraction.

use std::{
    fmt,
    fmt::{Debug, Display, Formatter},
    str::FromStr,
};
use thiserror::Error;

/// Party ID decode error.
#[derive(Error, Debug)]
#[error("invalid party id: {0}")]
pub struct InvalidPartyId(String);

/// Represents a party identifier within a computation.
///
/// Party ids are the 1-based integers assigned by the computation coordinator for the lifetime of
/// one session. Which id plays which role (dataset owner, query owner, compute-only delegate) is
/// fixed by the protocol topology.
#[derive(Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PartyId(u16);

impl PartyId {
    /// Constructs a party id from its wire value.
    pub const fn new(id: u16) -> Self {
        PartyId(id)
    }

    /// The wire value of this party id.
    pub fn value(&self) -> u16 {
        self.0
    }
}

impl FromStr for PartyId {
    type Err = InvalidPartyId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.parse().map_err(|_| InvalidPartyId(s.to_string()))?;
        Ok(Self(id))
    }
}

impl Display for PartyId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Debug for PartyId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "PartyId({})", self.0)
    }
}

impl From<u16> for PartyId {
    fn from(id: u16) -> Self {
        PartyId(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsing() {
        assert_eq!("3".parse::<PartyId>().unwrap(), PartyId::new(3));
        assert!("three".parse::<PartyId>().is_err());
        assert!("".parse::<PartyId>().is_err());
    }

    #[test]
    fn ordering() {
        let mut parties = vec![PartyId::new(3), PartyId::new(1), PartyId::new(2)];
        parties.sort();
        assert_eq!(parties, vec![PartyId::new(1), PartyId::new(2), PartyId::new(3)]);
    }
}
