//! Bounded top-K container over score groups

use crate::error::{RankError, RankResult, check_capacity};
use crate::scored::{Identifier, Score, ScoredItem};

/* ===================== ScoreGroup<I> ===================== */

/// All retained items sharing one score, in insertion order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreGroup<I> {
    score: Score,
    items: Vec<I>,
}

impl<I> ScoreGroup<I> {
    #[must_use]
    pub const fn score(&self) -> Score {
        self.score
    }

    #[must_use]
    pub fn items(&self) -> &[I] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Flatten into `(item, score)` pairs, keeping insertion order.
    pub fn into_scored(self) -> impl Iterator<Item = ScoredItem<I>> {
        let score = self.score;
        self.items.into_iter().map(move |i| ScoredItem::new(i, score))
    }

    pub(crate) fn sort_items(&mut self)
    where
        I: Ord,
    {
        self.items.sort();
    }
}

/* ===================== BoundedTopK<I> ===================== */

/// The highest-scoring **K score groups** seen so far.
///
/// Items with equal scores share one group. The container holds at most `k`
/// distinct scores; when an offer pushes it to `k + 1`, the group with the
/// smallest score is evicted whole. Because ties are grouped, the number of
/// *items* held can exceed `k`.
///
/// Storage is a vector of at most `k + 1` groups kept sorted by descending
/// score, so eviction is a `pop` and reading in rank order is a forward walk.
/// It grows with the distinct scores actually seen, never up front from `k`,
/// so any `k >= 1` is accepted.
///
/// # Example
/// ```
/// use ironrank::BoundedTopK;
///
/// let mut top = BoundedTopK::new(3)?;
/// for (item, score) in [("a", 5), ("b", 3), ("c", 8), ("d", 1), ("e", 8)] {
///     top.offer(item, score)?;
/// }
/// let scores: Vec<i64> = top.drain().iter().map(|g| g.score()).collect();
/// assert_eq!(scores, vec![8, 5, 3]);
/// assert_eq!(top.drain()[0].items(), &["c", "e"]);
/// # Ok::<(), ironrank::RankError>(())
/// ```
#[derive(Clone, Debug)]
pub struct BoundedTopK<I> {
    k: usize,
    groups: Vec<ScoreGroup<I>>,
    evicted_groups: u64,
    evicted_items: u64,
}

impl<I> BoundedTopK<I> {
    /// Create an empty container holding at most `k` score groups.
    ///
    /// # Errors
    /// Returns [`RankError::Capacity`] when `k == 0`.
    pub fn new(k: usize) -> RankResult<Self> {
        let k = check_capacity(k)?;
        Ok(Self {
            k,
            groups: Vec::new(),
            evicted_groups: 0,
            evicted_items: 0,
        })
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.k
    }

    /// Number of distinct score keys currently held (always `<= k`).
    #[must_use]
    pub fn distinct_scores(&self) -> usize {
        self.groups.len()
    }

    /// Number of items currently held, across all groups.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.groups.iter().map(ScoreGroup::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Smallest retained score, if any.
    #[must_use]
    pub fn min_score(&self) -> Option<Score> {
        self.groups.last().map(ScoreGroup::score)
    }

    /// Groups evicted so far.
    #[must_use]
    pub const fn evicted_groups(&self) -> u64 {
        self.evicted_groups
    }

    /// Items dropped with evicted groups so far.
    #[must_use]
    pub const fn evicted_items(&self) -> u64 {
        self.evicted_items
    }

    /// Retained groups in descending score order, without copying.
    #[must_use]
    pub fn groups(&self) -> &[ScoreGroup<I>] {
        &self.groups
    }

    /// Consume the container and return its groups in descending score order.
    #[must_use]
    pub fn into_groups(self) -> Vec<ScoreGroup<I>> {
        self.groups
    }
}

impl<I: Identifier> BoundedTopK<I> {
    /// Insert `item` into the group for `score`, then evict the lowest group if
    /// the number of distinct scores exceeds `k`.
    ///
    /// An offer whose score is below every retained score while the container
    /// is full creates a group that is evicted immediately.
    ///
    /// # Errors
    /// Returns [`RankError::InvalidScore`] for a negative score; the container
    /// is left untouched.
    pub fn offer(&mut self, item: I, score: Score) -> RankResult<()> {
        if score < 0 {
            return Err(RankError::invalid_score(&item, score));
        }

        // Sorted descending: an element precedes `score` when its score is larger.
        match self.groups.binary_search_by(|g| score.cmp(&g.score)) {
            Ok(pos) => self.groups[pos].items.push(item),
            Err(pos) => {
                self.groups.insert(
                    pos,
                    ScoreGroup {
                        score,
                        items: vec![item],
                    },
                );
                if self.groups.len() > self.k
                    && let Some(dropped) = self.groups.pop()
                {
                    self.evicted_groups += 1;
                    self.evicted_items += dropped.items.len() as u64;
                }
            }
        }
        Ok(())
    }

    /// Offer a [`ScoredItem`].
    ///
    /// # Errors
    /// See [`offer`](Self::offer).
    pub fn offer_scored(&mut self, scored: ScoredItem<I>) -> RankResult<()> {
        let (item, score) = scored.into_parts();
        self.offer(item, score)
    }

    /// Snapshot of every retained group in descending score order; items in
    /// a group keep insertion order.
    ///
    /// Reading does not mutate the container: two calls without an offer in
    /// between return identical results.
    #[must_use]
    pub fn drain(&self) -> Vec<ScoreGroup<I>> {
        self.groups.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores<I>(t: &BoundedTopK<I>) -> Vec<Score> {
        t.groups().iter().map(ScoreGroup::score).collect()
    }

    #[test]
    fn zero_capacity_rejected() {
        assert!(matches!(
            BoundedTopK::<String>::new(0),
            Err(RankError::Capacity(0))
        ));
    }

    #[test]
    fn ties_share_one_group() -> RankResult<()> {
        let mut t = BoundedTopK::new(1)?;
        t.offer("a", 4)?;
        t.offer("b", 4)?;
        t.offer("c", 4)?;
        assert_eq!(t.distinct_scores(), 1);
        assert_eq!(t.item_count(), 3);
        assert_eq!(t.groups()[0].items(), &["a", "b", "c"]);
        Ok(())
    }

    #[test]
    fn lower_score_at_capacity_is_dropped_immediately() -> RankResult<()> {
        let mut t = BoundedTopK::new(2)?;
        t.offer("a", 10)?;
        t.offer("b", 9)?;
        t.offer("c", 1)?;
        assert_eq!(scores(&t), vec![10, 9]);
        assert_eq!(t.evicted_groups(), 1);
        assert_eq!(t.evicted_items(), 1);
        Ok(())
    }

    #[test]
    fn negative_score_leaves_state_untouched() -> RankResult<()> {
        let mut t = BoundedTopK::new(2)?;
        t.offer("a", 1)?;
        let err = t.offer("b", -1).unwrap_err();
        assert!(matches!(err, RankError::InvalidScore { .. }));
        assert_eq!(t.item_count(), 1);
        Ok(())
    }

    #[test]
    fn huge_capacity_allocates_lazily() -> RankResult<()> {
        let mut t = BoundedTopK::new(usize::MAX)?;
        t.offer("a", 2)?;
        t.offer("b", 1)?;
        assert_eq!(scores(&t), vec![2, 1]);
        assert_eq!(t.evicted_groups(), 0);
        Ok(())
    }

    #[test]
    fn zero_score_is_valid() -> RankResult<()> {
        let mut t = BoundedTopK::new(2)?;
        t.offer("z", 0)?;
        assert_eq!(t.min_score(), Some(0));
        Ok(())
    }
}
