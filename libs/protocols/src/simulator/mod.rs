//! Simulators used to test protocols.
//!
//! Simulators must only be used in tests. Do not include in anything that is not a test.

#[cfg(any(test, feature = "testing"))]
pub mod plaintext;
