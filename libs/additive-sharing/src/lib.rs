//! Additive secret sharing over a prime field.
//!
//! Splits a plaintext integer into per-party field elements that sum to the original value mod
//! the field modulus, so one share per recipient can travel over a non-secure channel. Shares
//! are pure data: generating them touches nothing but the entropy source, and a share set is
//! discarded once transmitted.

#![deny(missing_docs)]

pub mod sharer;

pub use sharer::{AdditiveSecretSharer, SharerError};
