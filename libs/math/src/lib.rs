//! Prime field arithmetic for additive secret sharing.
//!
//! The protocols in this workspace operate over a prime field whose modulus is a
//! protocol-version-specific constant, not a free parameter: peers must agree on it ahead of
//! time. The field is small enough (at most 2^49) that all arithmetic fits comfortably in
//! native integers, so there is no big-number machinery here.

#![deny(missing_docs)]

pub mod errors;
pub mod fields;
pub mod random;

pub use errors::FieldError;
pub use fields::{FieldElement, PrimeField, MODULUS_V1, MODULUS_V2};
pub use random::MAX_SAMPLING_MODULUS;
