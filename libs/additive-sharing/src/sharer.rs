//! Additive secret sharer implementation.

use math_lib::{FieldElement, FieldError, PrimeField};
use rand::{rngs::OsRng, CryptoRng, RngCore};

/// An error during the construction of a secret sharer.
#[derive(Debug, thiserror::Error)]
pub enum SharerError {
    /// No parties were provided.
    #[error("at least one party is required")]
    NoParties,

    /// The field modulus is invalid.
    #[error(transparent)]
    Field(#[from] FieldError),
}

/// A type that performs additive secret sharing, turning secrets into shares and shares back
/// into secrets.
///
/// A sharing of `v` among `n` parties is `n` field elements whose sum mod the field modulus is
/// `v` mod the field modulus. All but the last share are uniformly random, the last one being
/// the difference that makes the invariant hold exactly.
pub struct AdditiveSecretSharer {
    field: PrimeField,
    party_count: usize,
}

impl AdditiveSecretSharer {
    /// Constructs a sharer for the given party count over the given modulus.
    ///
    /// All validation happens here: range violations are rejected before any share is
    /// generated or transmitted.
    pub fn new(party_count: usize, modulus: u64) -> Result<Self, SharerError> {
        if party_count == 0 {
            return Err(SharerError::NoParties);
        }
        let field = PrimeField::new(modulus)?;
        Ok(Self { field, party_count })
    }

    /// The number of parties this instance generates shares for.
    pub fn party_count(&self) -> usize {
        self.party_count
    }

    /// The field modulus in use.
    pub fn modulus(&self) -> u64 {
        self.field.modulus()
    }

    /// Generates shares for the given secret using the operating system's secure random source.
    pub fn generate_shares(&self, secret: i64) -> Vec<FieldElement> {
        self.generate_shares_with_rng(secret, &mut OsRng)
    }

    /// Generates shares for the given secret using the provided random source.
    pub fn generate_shares_with_rng<R: RngCore + CryptoRng>(&self, secret: i64, rng: &mut R) -> Vec<FieldElement> {
        let mut shares = Vec::with_capacity(self.party_count);
        let mut drawn_sum = self.field.element(0);
        for _ in 0..self.party_count - 1 {
            let share = self.field.random_element(rng);
            drawn_sum = self.field.add(drawn_sum, share);
            shares.push(share);
        }
        shares.push(self.field.sub(self.field.element(secret), drawn_sum));
        shares
    }

    /// Recovers the secret behind a full set of shares.
    pub fn recover<I>(&self, shares: I) -> FieldElement
    where
        I: IntoIterator<Item = FieldElement>,
    {
        shares.into_iter().fold(self.field.element(0), |sum, share| self.field.add(sum, share))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use rstest::rstest;

    #[test]
    fn party_count_is_validated() {
        assert!(matches!(AdditiveSecretSharer::new(0, 101), Err(SharerError::NoParties)));
        assert!(AdditiveSecretSharer::new(1, 101).is_ok());
    }

    #[test]
    fn oversized_modulus_is_rejected() {
        assert!(matches!(AdditiveSecretSharer::new(3, 1 << 50), Err(SharerError::Field(_))));
    }

    #[rstest]
    #[case(0, 1, 101)]
    #[case(42, 3, 101)]
    #[case(100, 2, 101)]
    #[case(-5, 4, 101)]
    #[case(7_777, 5, 24_499_973)]
    #[case(123_456, 3, 16_777_729)]
    #[test]
    fn shares_satisfy_the_sum_invariant(#[case] secret: i64, #[case] parties: usize, #[case] modulus: u64) {
        let sharer = AdditiveSecretSharer::new(parties, modulus).unwrap();
        let shares = sharer.generate_shares(secret);

        assert_eq!(shares.len(), parties);
        for share in &shares {
            assert!(share.value() < modulus);
        }
        let expected = secret.rem_euclid(modulus as i64) as u64;
        assert_eq!(sharer.recover(shares).value(), expected);
    }

    #[test]
    fn value_42_across_3_parties_mod_101() {
        let sharer = AdditiveSecretSharer::new(3, 101).unwrap();
        for _ in 0..50 {
            let shares = sharer.generate_shares(42);
            let sum: u64 = shares.iter().map(FieldElement::value).sum();
            assert_eq!(sum % 101, 42);
        }
    }

    #[test]
    fn single_party_sharing_is_the_secret_itself() {
        let sharer = AdditiveSecretSharer::new(1, 101).unwrap();
        assert_eq!(sharer.generate_shares(42), vec![math_lib::PrimeField::new(101).unwrap().element(42)]);
    }

    #[test]
    fn individual_shares_differ_across_calls() {
        let sharer = AdditiveSecretSharer::new(3, 24_499_973).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(1234);
        let first = sharer.generate_shares_with_rng(42, &mut rng);
        let second = sharer.generate_shares_with_rng(42, &mut rng);
        // Overwhelmingly likely over a 25 bit field; deterministic under the seeded rng.
        assert_ne!(first, second);
    }
}
