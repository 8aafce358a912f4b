//! Prime field over a runtime modulus.

use crate::{errors::FieldError, random::random_below, MAX_SAMPLING_MODULUS};
use rand::{CryptoRng, RngCore};

/// The field modulus used by version 1 of the benchmarking protocol.
pub const MODULUS_V1: u64 = 16_777_729;

/// The field modulus used by version 2 of the benchmarking protocol.
pub const MODULUS_V2: u64 = 24_499_973;

/// An element of a prime field, in `[0, modulus)`.
///
/// Elements do not carry their modulus; they are only meaningful relative to the
/// [PrimeField] that produced them, which performs all arithmetic.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FieldElement {
    value: u64,
}

impl FieldElement {
    /// The canonical representative of this element.
    pub fn value(&self) -> u64 {
        self.value
    }
}

/// A prime field with a runtime modulus.
///
/// The modulus is validated for range only; primality is the caller's responsibility since the
/// protocol moduli are fixed, well-known constants (see [MODULUS_V1], [MODULUS_V2]).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PrimeField {
    modulus: u64,
}

impl PrimeField {
    /// Constructs a field over the given modulus.
    ///
    /// Fails if the modulus cannot define a field or exceeds the unbiased sampling ceiling
    /// of 2^49.
    pub fn new(modulus: u64) -> Result<Self, FieldError> {
        if modulus < 2 {
            return Err(FieldError::ModulusTooSmall);
        }
        if modulus > MAX_SAMPLING_MODULUS {
            return Err(FieldError::ModulusTooLarge);
        }
        Ok(Self { modulus })
    }

    /// The modulus of this field.
    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    /// Reduces an integer into the field.
    ///
    /// Negative inputs reduce Euclidean-style, so `-1` maps to `modulus - 1`.
    pub fn element(&self, value: i64) -> FieldElement {
        // The modulus fits 2^49 so the cast is lossless.
        let value = value.rem_euclid(self.modulus as i64) as u64;
        FieldElement { value }
    }

    /// Adds two elements mod the field modulus.
    pub fn add(&self, lhs: FieldElement, rhs: FieldElement) -> FieldElement {
        FieldElement { value: (lhs.value + rhs.value) % self.modulus }
    }

    /// Subtracts `rhs` from `lhs` mod the field modulus.
    pub fn sub(&self, lhs: FieldElement, rhs: FieldElement) -> FieldElement {
        FieldElement { value: (lhs.value + self.modulus - rhs.value) % self.modulus }
    }

    /// Draws a uniformly random element using the provided random source.
    pub fn random_element<R: RngCore + CryptoRng>(&self, rng: &mut R) -> FieldElement {
        FieldElement { value: random_below(rng, self.modulus) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use rstest::rstest;

    #[test]
    fn modulus_bounds_are_enforced() {
        assert_eq!(PrimeField::new(0), Err(FieldError::ModulusTooSmall));
        assert_eq!(PrimeField::new(1), Err(FieldError::ModulusTooSmall));
        assert!(PrimeField::new(2).is_ok());
        assert!(PrimeField::new(MAX_SAMPLING_MODULUS).is_ok());
        assert_eq!(PrimeField::new(MAX_SAMPLING_MODULUS + 1), Err(FieldError::ModulusTooLarge));
    }

    #[rstest]
    #[case(0, 0)]
    #[case(42, 42)]
    #[case(101, 0)]
    #[case(105, 4)]
    #[case(-1, 100)]
    #[case(-101, 0)]
    #[test]
    fn reduction(#[case] value: i64, #[case] expected: u64) {
        let field = PrimeField::new(101).unwrap();
        assert_eq!(field.element(value).value(), expected);
    }

    #[test]
    fn addition_wraps() {
        let field = PrimeField::new(101).unwrap();
        let sum = field.add(field.element(100), field.element(3));
        assert_eq!(sum, field.element(2));
    }

    #[test]
    fn subtraction_wraps() {
        let field = PrimeField::new(101).unwrap();
        let difference = field.sub(field.element(3), field.element(100));
        assert_eq!(difference, field.element(4));
    }

    #[test]
    fn random_elements_are_reduced() {
        let field = PrimeField::new(MODULUS_V2).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        for _ in 0..100 {
            assert!(field.random_element(&mut rng).value() < MODULUS_V2);
        }
    }
}
