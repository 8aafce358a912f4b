//! Oblivious sorting network.
//!
//! Batcher's odd-even merge sort: a fixed-topology compare-exchange network whose shape
//! depends only on the input length, never on the values. Every compare-exchange resolves via
//! oblivious select, so no party observes any ordering outcome.

use crate::share::SecretShare;

/// Sorts secrets into ascending order without revealing any comparison outcome.
///
/// The input is not mutated: every handle is first refreshed into a scratch buffer (by adding
/// the additive identity), which also prevents the output from aliasing caller-held handles.
/// The internal routines then compare-exchange the buffer in place.
///
/// The network is laid out for the next power of two and index pairs past the end are skipped
/// rather than padded, which keeps it correct for arbitrary input lengths: the skipped slots
/// correspond to maximal padding values that would never move. Costs O(n log^2 n)
/// compare-exchanges.
pub fn sort<S: SecretShare>(secrets: &[S]) -> Vec<S> {
    let mut buffer: Vec<S> = secrets.iter().map(|secret| secret.offset(0)).collect();
    if buffer.len() > 1 {
        let padded_length = buffer.len().next_power_of_two();
        odd_even_sort(&mut buffer, 0, padded_length);
    }
    buffer
}

/// Recursively sorts the `n` elements starting at `lo`. `n` is a power of two.
fn odd_even_sort<S: SecretShare>(buffer: &mut [S], lo: usize, n: usize) {
    if n > 1 {
        let half = n / 2;
        odd_even_sort(buffer, lo, half);
        odd_even_sort(buffer, lo + half, half);
        odd_even_merge(buffer, lo, n, 1);
    }
}

/// Merges the two sorted halves of the `n` elements starting at `lo`, comparing at stride `r`.
fn odd_even_merge<S: SecretShare>(buffer: &mut [S], lo: usize, n: usize, r: usize) {
    let step = r * 2;
    if step < n {
        odd_even_merge(buffer, lo, n, step);
        odd_even_merge(buffer, lo + r, n, step);

        let mut i = lo + r;
        while i + r < lo + n {
            compare_exchange(buffer, i, i + r);
            i += step;
        }
    } else {
        compare_exchange(buffer, lo, lo + r);
    }
}

/// Obliviously orders the pair at `(i, j)` so the smaller value ends up at `i`.
fn compare_exchange<S: SecretShare>(buffer: &mut [S], i: usize, j: usize) {
    if i >= buffer.len() || j >= buffer.len() {
        return;
    }

    let out_of_order = buffer[i].greater_than(&buffer[j]);
    let smaller = out_of_order.select(&buffer[j], &buffer[i]);
    let larger = out_of_order.select(&buffer[i], &buffer[j]);
    buffer[i] = smaller;
    buffer[j] = larger;
}

#[cfg(test)]
mod tests {
    use crate::simulator::plaintext::PlaintextShare;
    use math_lib::MODULUS_V2;
    use rstest::rstest;

    fn shares(values: &[u64]) -> Vec<PlaintextShare> {
        values.iter().map(|value| PlaintextShare::new(*value, MODULUS_V2)).collect()
    }

    fn values(shares: &[PlaintextShare]) -> Vec<u64> {
        shares.iter().map(PlaintextShare::value).collect()
    }

    #[rstest]
    #[case(&[])]
    #[case(&[5])]
    #[case(&[2, 1])]
    #[case(&[3, 1, 2])]
    #[case(&[3, 2, 1])]
    #[case(&[4, 3, 2, 1])]
    #[case(&[9, 1, 8, 2, 7])]
    #[case(&[6, 5, 4, 3, 2, 1])]
    #[case(&[13, 3, 7, 11, 2, 5, 1])]
    #[case(&[8, 7, 6, 5, 4, 3, 2, 1])]
    #[case(&[5, 5, 1, 5, 2, 2, 9, 0, 5])]
    #[test]
    fn output_is_sorted_and_a_permutation(#[case] input: &[u64]) {
        let sorted = super::sort(&shares(input));
        let sorted = values(&sorted);

        let mut expected = input.to_vec();
        expected.sort_unstable();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn input_is_not_mutated() {
        let input = shares(&[3, 1, 2]);
        let _ = super::sort(&input);
        assert_eq!(values(&input), vec![3, 1, 2]);
    }
}
