//! Oblivious rank computation.
//!
//! Two equivalent formulations of ranking a query within a secret dataset. The running-count
//! form is the one the benchmarking protocols use, since they rank a single query against the
//! full dataset; the sort-then-match form ranks many queries at once against an already sorted
//! dataset (see [crate::sort]).

use crate::share::SecretShare;

/// Computes, for every query, its 1-based position within the sorted dataset.
///
/// Each rank accumulates `select(sorted[i] == query, i + 1, rank)` over all positions. When
/// several dataset elements equal a query, the rank resolves to the lowest matching sorted
/// position; positions are visited in descending order so the last oblivious overwrite is the
/// smallest index. A query matching no dataset element ranks 0.
pub fn ranking<S: SecretShare>(sorted: &[S], queries: &[S]) -> Vec<S> {
    let mut ranks: Vec<S> = queries.iter().map(|query| query.sub(query)).collect();

    for i in (0..sorted.len()).rev() {
        for (rank, query) in ranks.iter_mut().zip(queries) {
            let matches = sorted[i].equals(query);
            let position = query.sub(query).offset(i as u64 + 1);
            *rank = matches.select(&position, rank);
        }
    }

    ranks
}

/// Counts the dataset elements strictly less than the query, as a secret value.
///
/// This avoids the O(n log^2 n) sorting network entirely: O(n) oblivious comparisons summed as
/// secrets and opened once by whoever is entitled to the result. The 1-based rank is the
/// opened count plus one.
pub fn ranking_single<S: SecretShare>(query: &S, dataset: &[S]) -> S {
    // A secret zero, constructed without a session round trip.
    let mut result = query.sub(query);

    for entry in dataset {
        result = result.add(&query.greater_than(entry));
    }

    result
}

#[cfg(test)]
mod tests {
    use crate::{simulator::plaintext::PlaintextShare, sort::sort};
    use math_lib::MODULUS_V2;
    use rstest::rstest;

    fn shares(values: &[u64]) -> Vec<PlaintextShare> {
        values.iter().map(|value| PlaintextShare::new(*value, MODULUS_V2)).collect()
    }

    #[rstest]
    #[case(10, &[], 0)]
    #[case(10, &[3, 25, 1, 17], 2)]
    #[case(0, &[3, 25, 1, 17], 0)]
    #[case(100, &[3, 25, 1, 17], 4)]
    #[case(17, &[3, 25, 1, 17], 2)]
    #[test]
    fn running_count_matches_strictly_smaller_elements(#[case] query: u64, #[case] dataset: &[u64], #[case] expected: u64) {
        let query = PlaintextShare::new(query, MODULUS_V2);
        let count = super::ranking_single(&query, &shares(dataset));
        assert_eq!(count.value(), expected);
    }

    #[test]
    fn sorted_positions_are_one_based() {
        let dataset = shares(&[40, 10, 30, 20]);
        let sorted = sort(&dataset);
        let ranks = super::ranking(&sorted, &dataset);
        let ranks: Vec<u64> = ranks.iter().map(PlaintextShare::value).collect();
        assert_eq!(ranks, vec![4, 1, 3, 2]);
    }

    #[test]
    fn ties_resolve_to_the_lowest_matching_position() {
        let dataset = shares(&[7, 7, 1]);
        let sorted = sort(&dataset);
        let ranks = super::ranking(&sorted, &shares(&[7]));
        assert_eq!(ranks[0].value(), 2);
    }

    #[test]
    fn unmatched_queries_rank_zero() {
        let sorted = sort(&shares(&[1, 2, 3]));
        let ranks = super::ranking(&sorted, &shares(&[4]));
        assert_eq!(ranks[0].value(), 0);
    }

    #[test]
    fn formulations_agree_on_distinct_values() {
        let values = [12u64, 5, 42, 33, 8, 27, 3];
        let dataset = shares(&values);
        let sorted = sort(&dataset);
        let matched = super::ranking(&sorted, &dataset);

        for (index, query) in dataset.iter().enumerate() {
            let others: Vec<PlaintextShare> =
                dataset.iter().enumerate().filter(|(i, _)| *i != index).map(|(_, s)| s.clone()).collect();
            // Rank within the full dataset equals one plus the count of strictly smaller
            // elements among the rest, values being distinct.
            let counted = super::ranking_single(query, &others);
            assert_eq!(matched[index].value(), counted.value() + 1);
        }
    }
}
