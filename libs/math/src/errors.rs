//! Math errors.

/// An error during the construction of a prime field.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// The modulus is too small to define a field.
    #[error("modulus must be at least 2")]
    ModulusTooSmall,

    /// The modulus exceeds the unbiased sampling ceiling.
    #[error("modulus must be smaller than or equal to 2^49")]
    ModulusTooLarge,
}
