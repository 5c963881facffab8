//! Local aggregation: the per-partition first stage.
//!
//! A [`LocalAggregator`] owns one [`BoundedTopK`] for one partition. It reads
//! the partition once, offering each record in order, and when the partition is
//! exhausted it re-emits everything it still holds as [`Candidate`]s.
//!
//! # Approximation
//!
//! Pruning happens before any cross-partition combination. Each record's score
//! is taken as final for that partition; an item whose occurrences are split
//! over several partitions is never re-summed. Such an item can be correctly
//! discarded in every partition yet belong to the true global top-K, and it
//! will then be missing from the final output. The same identifier can also
//! reach the merger several times with different scores. Both effects are part
//! of the contract.

use crate::combiners::BoundedTopK;
use crate::error::{RankError, RankResult};
use crate::funnel::FunnelSender;
use crate::metrics::PartitionStats;
use crate::scored::{Candidate, Identifier, ScoredItem};
use tracing::{debug, warn};

/// Per-partition bounded retention of the highest-scoring score groups.
#[derive(Debug)]
pub struct LocalAggregator<I> {
    partition: usize,
    top: BoundedTopK<I>,
    records: u64,
}

impl<I: Identifier> LocalAggregator<I> {
    /// Fresh aggregator for `partition` with capacity `k`.
    ///
    /// # Errors
    /// Returns [`RankError::Capacity`](crate::RankError::Capacity) when `k == 0`.
    pub fn new(partition: usize, k: usize) -> RankResult<Self> {
        Ok(Self {
            partition,
            top: BoundedTopK::new(k)?,
            records: 0,
        })
    }

    #[must_use]
    pub const fn partition(&self) -> usize {
        self.partition
    }

    /// Offer one record.
    ///
    /// # Errors
    /// Returns [`RankError::InvalidScore`](crate::RankError::InvalidScore) for a
    /// negative score.
    pub fn offer(&mut self, record: ScoredItem<I>) -> RankResult<()> {
        self.top.offer_scored(record)?;
        self.records += 1;
        Ok(())
    }

    /// Offer every record of the partition in order, stopping at the first bad one.
    ///
    /// # Errors
    /// See [`offer`](Self::offer).
    pub fn consume(&mut self, records: impl IntoIterator<Item = ScoredItem<I>>) -> RankResult<()> {
        records.into_iter().try_for_each(|r| self.offer(r))
    }

    /// Read-only view of what is currently retained.
    #[must_use]
    pub const fn retained(&self) -> &BoundedTopK<I> {
        &self.top
    }

    /// End of partition: every retained `(item, score)` in descending score
    /// order, plus this partition's counters.
    #[must_use]
    pub fn finish(self) -> (Vec<Candidate<I>>, PartitionStats) {
        let mut stats = PartitionStats {
            partition: self.partition,
            records: self.records,
            evicted_groups: self.top.evicted_groups(),
            evicted_items: self.top.evicted_items(),
            candidates: 0,
        };
        let candidates: Vec<Candidate<I>> = self
            .top
            .into_groups()
            .into_iter()
            .flat_map(|g| g.into_scored())
            .map(Candidate::from)
            .collect();
        stats.candidates = candidates.len() as u64;
        debug!(
            partition = stats.partition,
            records = stats.records,
            evicted_groups = stats.evicted_groups,
            candidates = stats.candidates,
            "local aggregation finished"
        );
        (candidates, stats)
    }

    /// End of partition, forwarding every candidate into the funnel.
    ///
    /// # Errors
    /// Returns [`RankError::FunnelClosed`] if the receiver was dropped before
    /// every candidate was delivered.
    pub fn emit(self, funnel: &FunnelSender<I>) -> RankResult<PartitionStats> {
        let (candidates, stats) = self.finish();
        let total = candidates.len();
        let sent = funnel.send_all(candidates);
        if sent < total {
            warn!(partition = stats.partition, sent, total, "funnel closed mid-partition");
            return Err(RankError::FunnelClosed {
                partition: stats.partition,
                unsent: total - sent,
            });
        }
        Ok(stats)
    }
}

/// Run one whole partition through a fresh [`LocalAggregator`] and forward its
/// candidates.
///
/// # Errors
/// Fails on the first invalid record or on `k == 0`, in which case nothing is
/// sent, or when the funnel's receiver is gone.
pub fn aggregate_partition<I: Identifier>(
    partition: usize,
    k: usize,
    records: impl IntoIterator<Item = ScoredItem<I>>,
    funnel: &FunnelSender<I>,
) -> RankResult<PartitionStats> {
    debug!(partition, k, "local aggregation started");
    let mut agg = LocalAggregator::new(partition, k)?;
    agg.consume(records)?;
    agg.emit(funnel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::funnel::funnel;

    fn items(v: &[(&'static str, i64)]) -> Vec<ScoredItem<&'static str>> {
        v.iter().map(|&(i, s)| ScoredItem::new(i, s)).collect()
    }

    #[test]
    fn finish_emits_descending_groups() -> RankResult<()> {
        let mut agg = LocalAggregator::new(0, 3)?;
        agg.consume(items(&[("a", 5), ("b", 3), ("c", 8), ("d", 1), ("e", 8)]))?;
        let (cands, stats) = agg.finish();
        let got: Vec<_> = cands.iter().map(|c| (*c.item(), c.score())).collect();
        assert_eq!(got, vec![("c", 8), ("e", 8), ("a", 5), ("b", 3)]);
        assert_eq!(stats.records, 5);
        assert_eq!(stats.evicted_items, 1);
        assert_eq!(stats.candidates, 4);
        Ok(())
    }

    #[test]
    fn failed_partition_sends_nothing() {
        let (tx, rx) = funnel();
        let res = aggregate_partition(2, 3, items(&[("a", 1), ("b", -2)]), &tx);
        assert!(matches!(res, Err(RankError::InvalidScore { .. })));
        drop(tx);
        assert_eq!(rx.into_iter().count(), 0);
    }

    #[test]
    fn dropped_merger_fails_the_partition() {
        let (tx, rx) = funnel();
        drop(rx);
        let res = aggregate_partition(4, 2, items(&[("a", 3), ("b", 1)]), &tx);
        assert_eq!(
            res,
            Err(RankError::FunnelClosed {
                partition: 4,
                unsent: 2
            })
        );
    }
}
