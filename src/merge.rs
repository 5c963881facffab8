//! Global merge: the single second stage.
//!
//! The [`GlobalMerger`] consumes the union of every partition's candidates into
//! one [`BoundedTopK`] of the same capacity, then walks it in descending score
//! order and emits items until exactly `k` *items* have been written. A tied
//! group that straddles position `k` is cut mid-group.
//!
//! # Ties at the boundary
//!
//! With [`TieBreak::InsertionOrder`] the cut keeps whichever tied items arrived
//! first. Candidate arrival order across partitions is not fixed in parallel
//! runs, so the members of a straddling group may differ between runs; the
//! output *scores* never do. [`TieBreak::Lexicographic`] sorts each group by
//! identifier before the cut, which makes the output fully deterministic at the
//! price of diverging from arrival-order parity.

use crate::combiners::{BoundedTopK, ScoreGroup};
use crate::error::RankResult;
use crate::funnel::FunnelReceiver;
use crate::metrics::MergeStats;
use crate::scored::{Candidate, Identifier, ScoredItem};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Ordering of items inside a tied group when the `k`-th position falls in it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Keep arrival order (parity with the two-stage job).
    #[default]
    InsertionOrder,
    /// Sort tied items by identifier, ascending.
    Lexicographic,
}

/// The one merger that produces the final ranking.
#[derive(Debug)]
pub struct GlobalMerger<I> {
    k: usize,
    tie_break: TieBreak,
    top: BoundedTopK<I>,
    received: u64,
}

impl<I: Identifier> GlobalMerger<I> {
    /// # Errors
    /// Returns [`RankError::Capacity`](crate::RankError::Capacity) when `k == 0`.
    pub fn new(k: usize, tie_break: TieBreak) -> RankResult<Self> {
        Ok(Self {
            k,
            tie_break,
            top: BoundedTopK::new(k)?,
            received: 0,
        })
    }

    /// Accept one candidate.
    ///
    /// # Errors
    /// Returns [`RankError::InvalidScore`](crate::RankError::InvalidScore) for a
    /// negative score.
    pub fn accept(&mut self, candidate: Candidate<I>) -> RankResult<()> {
        self.top.offer_scored(candidate.into_scored())?;
        self.received += 1;
        Ok(())
    }

    /// Accept every candidate from an iterator or a [`FunnelReceiver`].
    ///
    /// # Errors
    /// Stops at the first invalid candidate.
    pub fn consume(&mut self, candidates: impl IntoIterator<Item = Candidate<I>>) -> RankResult<()> {
        candidates.into_iter().try_for_each(|c| self.accept(c))
    }

    /// Drain the funnel until every sender has gone.
    ///
    /// # Errors
    /// Stops at the first invalid candidate.
    pub fn consume_funnel(&mut self, funnel: FunnelReceiver<I>) -> RankResult<()> {
        self.consume(funnel)
    }

    #[must_use]
    pub const fn retained(&self) -> &BoundedTopK<I> {
        &self.top
    }

    /// Ranked output without consuming the merger.
    #[must_use]
    pub fn ranked(&self) -> Vec<ScoredItem<I>> {
        truncate_to_k(self.top.drain(), self.k, self.tie_break)
    }

    /// End of stream: at most `k` items in descending score order, plus counters.
    #[must_use]
    pub fn finish(self) -> (Vec<ScoredItem<I>>, MergeStats) {
        let mut stats = MergeStats {
            candidates: self.received,
            evicted_groups: self.top.evicted_groups(),
            evicted_items: self.top.evicted_items(),
            retained_items: self.top.item_count() as u64,
            emitted: 0,
        };
        let ranked = truncate_to_k(self.top.into_groups(), self.k, self.tie_break);
        stats.emitted = ranked.len() as u64;
        debug!(
            candidates = stats.candidates,
            retained = stats.retained_items,
            emitted = stats.emitted,
            "global merge finished"
        );
        (ranked, stats)
    }
}

/// Walk groups in order, emitting items until `k` have been written. The walk
/// stops outright when the next item would be the `(k+1)`-th, abandoning the
/// rest of that group and every later group.
fn truncate_to_k<I: Ord>(
    groups: Vec<ScoreGroup<I>>,
    k: usize,
    tie_break: TieBreak,
) -> Vec<ScoredItem<I>> {
    let held: usize = groups.iter().map(ScoreGroup::len).sum();
    let mut out = Vec::with_capacity(held.min(k));
    'groups: for mut group in groups {
        if tie_break == TieBreak::Lexicographic {
            group.sort_items();
        }
        for item in group.into_scored() {
            if out.len() == k {
                break 'groups;
            }
            out.push(item);
        }
    }
    out
}

/// Merge candidates from any source into the final ranking.
///
/// # Errors
/// Fails on `k == 0` or on the first negative score.
pub fn merge_candidates<I: Identifier>(
    k: usize,
    tie_break: TieBreak,
    candidates: impl IntoIterator<Item = Candidate<I>>,
) -> RankResult<(Vec<ScoredItem<I>>, MergeStats)> {
    let mut merger = GlobalMerger::new(k, tie_break)?;
    merger.consume(candidates)?;
    Ok(merger.finish())
}
