//! Basic types shared across the benchmarking client crates.

#![deny(missing_docs)]

pub mod party;

pub use party::{InvalidPartyId, PartyId};
