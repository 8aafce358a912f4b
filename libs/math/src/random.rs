//! Unbiased bounded random sampling.

use rand::{CryptoRng, RngCore};

/// The largest modulus [random_below] can sample against without bias.
///
/// Sampling draws whole bytes and rejects draws past the largest multiple of the modulus that
/// fits the drawn width. 2^49 keeps the widest draw at 7 bytes, well within a `u64`.
pub const MAX_SAMPLING_MODULUS: u64 = 1 << 49;

/// Draws a uniformly distributed value in `[0, modulus)` from the given random source.
///
/// The caller must ensure `1 <= modulus <= MAX_SAMPLING_MODULUS`; [crate::PrimeField]
/// enforces this at construction time.
///
/// Uses rejection sampling to avoid modulo bias: the minimal byte width covering the modulus is
/// drawn and interpreted as a big-endian integer, and any draw at or past the largest multiple
/// of the modulus within that width is discarded.
pub(crate) fn random_below<R: RngCore + CryptoRng>(rng: &mut R, modulus: u64) -> u64 {
    debug_assert!(modulus >= 1 && modulus <= MAX_SAMPLING_MODULUS);
    if modulus == 1 {
        return 0;
    }

    let bits_needed = 64 - (modulus - 1).leading_zeros() as usize;
    let bytes_needed = bits_needed.div_ceil(8);
    let max_value = 1u64 << (bytes_needed * 8);
    let limit = max_value - (max_value % modulus);

    let mut buffer = [0u8; 8];
    loop {
        rng.fill_bytes(&mut buffer[..bytes_needed]);
        let mut value = 0u64;
        for byte in &buffer[..bytes_needed] {
            value = (value << 8) | u64::from(*byte);
        }
        if value < limit {
            return value % modulus;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use rstest::rstest;

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(101)]
    #[case(256)]
    #[case(257)]
    #[case(16_777_729)]
    #[case(24_499_973)]
    #[case(MAX_SAMPLING_MODULUS)]
    #[test]
    fn values_stay_below_modulus(#[case] modulus: u64) {
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        for _ in 0..500 {
            assert!(random_below(&mut rng, modulus) < modulus);
        }
    }

    #[test]
    fn small_moduli_cover_their_range() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let mut seen = [false; 5];
        for _ in 0..200 {
            seen[random_below(&mut rng, 5) as usize] = true;
        }
        assert!(seen.iter().all(|hit| *hit));
    }
}
