//! Rank statistics.

/// Maps a 1-based rank within a dataset to a decile in `[1, 10]`.
///
/// The rank is clamped into `[1, dataset_size]` first; an empty dataset maps to decile 1.
/// Datasets smaller than 10 use one bucket per element, so there the decile equals the
/// clamped rank. Pure and deterministic; derived results are recomputed from
/// `(rank, dataset_size)` rather than stored.
pub fn quantile(rank: u64, dataset_size: u64) -> u8 {
    if dataset_size == 0 {
        return 1;
    }

    let clamped = rank.clamp(1, dataset_size);
    let buckets = dataset_size.min(10);
    let quantile = (clamped * buckets).div_ceil(dataset_size);
    quantile.clamp(1, 10) as u8
}
