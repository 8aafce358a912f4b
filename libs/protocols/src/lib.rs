//! Oblivious protocols over secret-shared values.
//!
//! Everything here is generic over the [SecretShare][share::SecretShare] capability set and the
//! [ComputeSession][session::ComputeSession] facade, so the same protocol code runs against the
//! plaintext simulator in tests and against a real secure-computation backend in production.
//! Operations on shares never branch on plaintext: comparison outcomes stay secret until a
//! party entitled to them opens the final result.

#![deny(missing_docs)]

pub mod algebra;
pub mod rank;
pub mod session;
pub mod share;
pub mod sharing;
pub mod simulator;
pub mod sort;

pub use algebra::{dot_product, AlgebraError};
pub use rank::{ranking, ranking_single};
pub use session::{ComputeSession, PartyShares, SessionConfig, SessionConnector, SessionError};
pub use share::SecretShare;
pub use sharing::{share_dataset_secrets, share_transformed_secrets, ProtocolError, SharedDataset, TransformedDataset};
pub use sort::sort;
