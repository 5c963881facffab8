//! Pre-built record streams for testing both ranking stages.

use crate::scored::{Score, ScoredItem};

/// The single-partition worked example: with `k = 3` the local stage keeps
/// `{8: [c, e], 5: [a], 3: [b]}` and the merger emits `c, e, a`.
///
/// # Example
///
/// ```
/// use ironrank::testing::single_partition_example;
///
/// assert_eq!(single_partition_example().len(), 5);
/// ```
#[must_use]
pub fn single_partition_example() -> Vec<ScoredItem<String>> {
    scored(&[("a", 5), ("b", 3), ("c", 8), ("d", 1), ("e", 8)])
}

/// Two partitions where `x` is split 7 + 7. Its combined 14 would top the
/// ranking, but with `k = 3` it falls out of both local sets and never reaches
/// the merger.
#[must_use]
pub fn split_item_partitions() -> Vec<Vec<ScoredItem<String>>> {
    vec![
        scored(&[("a", 10), ("x", 7), ("b", 9), ("c", 8)]),
        scored(&[("d", 10), ("e", 9), ("x", 7), ("f", 8)]),
    ]
}

/// Word-count style records as the counting stage would emit them.
#[must_use]
pub fn word_count_records() -> Vec<ScoredItem<String>> {
    scored(&[
        ("the", 42),
        ("and", 30),
        ("rust", 17),
        ("ownership", 9),
        ("borrow", 9),
        ("trait", 5),
        ("lifetime", 3),
        ("crate", 1),
    ])
}

/// Build owned records from `(item, score)` literals.
#[must_use]
pub fn scored(pairs: &[(&str, Score)]) -> Vec<ScoredItem<String>> {
    pairs
        .iter()
        .map(|&(i, s)| ScoredItem::new(i.to_string(), s))
        .collect()
}

/// Deterministic pseudo-random records: `len` items named `w0..`, scores in
/// `0..max_score`, reproducible from `seed`.
///
/// # Example
///
/// ```
/// use ironrank::testing::seeded_records;
///
/// assert_eq!(seeded_records(7, 100, 10), seeded_records(7, 100, 10));
/// ```
#[must_use]
pub fn seeded_records(seed: u64, len: usize, max_score: u64) -> Vec<ScoredItem<String>> {
    let mut rng = SplitMix64::new(seed);
    let bound = max_score.max(1);
    (0..len)
        .map(|i| {
            let score = Score::try_from(rng.next_u64() % bound).unwrap_or(Score::MAX);
            ScoredItem::new(format!("w{i}"), score)
        })
        .collect()
}

#[derive(Clone, Copy, Debug)]
struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    #[inline]
    const fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}
