//! Execution of the two-stage pipeline.
//!
//! `partitions → N local aggregators → funnel → 1 global merger → ranked output`
//!
//! - [`ExecMode::Sequential`]: partitions run one after another on the calling
//!   thread; the merger drains the funnel once they are all done.
//! - [`ExecMode::Parallel`]: partitions run on a rayon pool while the merger
//!   drains the funnel on its own scoped thread, so candidates are merged as
//!   they arrive.
//!
//! The merger is always a single consumer. Partition order never changes which
//! scores come out; with [`TieBreak::InsertionOrder`](crate::TieBreak) it can
//! change which members of a group tied at position `k` are kept.

use crate::aggregate::aggregate_partition;
use crate::config::{ExecMode, RankConfig};
use crate::error::RankResult;
use crate::funnel::funnel;
use crate::merge::{GlobalMerger, TieBreak};
use crate::metrics::{MergeStats, PartitionStats, RunMetrics};
use crate::scored::{Identifier, ScoredItem};
use anyhow::{Context, Result, anyhow};
use rayon::prelude::*;
use std::thread;
use std::time::Instant;
use tracing::{info, warn};

/// Final ranking plus what it took to get there.
#[derive(Clone, Debug)]
pub struct RankOutcome<I> {
    /// At most `k` items, descending by score.
    pub ranked: Vec<ScoredItem<I>>,
    pub metrics: RunMetrics,
}

type StageOutput<I> = (Vec<ScoredItem<I>>, Vec<PartitionStats>, MergeStats);

#[derive(Debug)]
pub struct Runner {
    pub config: RankConfig,
    /// Split count for [`run_records`](Self::run_records) in parallel mode when
    /// the config does not give one.
    pub default_partitions: usize,
}

impl Runner {
    /// Validate `config` and build a runner. Capacity problems surface here,
    /// before any record is read.
    ///
    /// # Errors
    /// Returns [`RankError::Capacity`](crate::RankError::Capacity) when `k == 0`.
    pub fn new(config: RankConfig) -> RankResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            default_partitions: 2 * num_cpus::get().max(2),
        })
    }

    /// Run pre-partitioned input: one local aggregator per inner vector.
    ///
    /// # Errors
    /// Fails on the first invalid record in any partition, or if the merger
    /// thread dies.
    pub fn run<I: Identifier>(&self, partitions: Vec<Vec<ScoredItem<I>>>) -> Result<RankOutcome<I>> {
        let RankConfig { k, mode, tie_break } = self.config;
        let n = partitions.len();
        if n == 0 {
            warn!("no partitions supplied; output will be empty");
        }
        info!(k, partitions = n, ?mode, ?tie_break, "ranking run started");

        let started = Instant::now();
        let (ranked, partition_stats, merge) = match mode {
            ExecMode::Sequential => exec_seq(k, tie_break, partitions)?,
            ExecMode::Parallel { threads, .. } => exec_parallel(k, tie_break, partitions, threads)?,
        };
        let metrics = RunMetrics {
            k,
            partitions: partition_stats,
            merge,
            elapsed: started.elapsed(),
        };
        info!(
            records = metrics.total_records(),
            candidates = metrics.total_candidates(),
            emitted = metrics.merge.emitted,
            elapsed_ms = metrics.elapsed.as_millis() as u64,
            "ranking run finished"
        );
        Ok(RankOutcome { ranked, metrics })
    }

    /// Run a flat input, splitting it into contiguous partitions first.
    ///
    /// Sequential mode uses a single partition. Parallel mode uses the
    /// configured partition count (or [`default_partitions`](Self::default_partitions)),
    /// clamped to the input length. Because local pruning is lossy, the split
    /// can change the result.
    ///
    /// # Errors
    /// See [`run`](Self::run).
    pub fn run_records<I: Identifier>(&self, records: Vec<ScoredItem<I>>) -> Result<RankOutcome<I>> {
        let parts = match self.config.mode {
            ExecMode::Sequential => 1,
            ExecMode::Parallel { partitions, .. } => partitions.unwrap_or(self.default_partitions),
        };
        self.run(split_vec(records, parts))
    }
}

/// Sequential executor (partitions in order, then the merger)
fn exec_seq<I: Identifier>(
    k: usize,
    tie_break: TieBreak,
    partitions: Vec<Vec<ScoredItem<I>>>,
) -> RankResult<StageOutput<I>> {
    let mut merger = GlobalMerger::new(k, tie_break)?;
    let (tx, rx) = funnel();
    let stats = partitions
        .into_iter()
        .enumerate()
        .map(|(idx, part)| aggregate_partition(idx, k, part, &tx))
        .collect::<RankResult<Vec<_>>>()?;
    drop(tx);

    merger.consume_funnel(rx)?;
    let (ranked, merge) = merger.finish();
    Ok((ranked, stats, merge))
}

/// Parallel executor (local aggregators on rayon → funnel → merger thread)
fn exec_parallel<I: Identifier>(
    k: usize,
    tie_break: TieBreak,
    partitions: Vec<Vec<ScoredItem<I>>>,
    threads: Option<usize>,
) -> Result<StageOutput<I>> {
    let mut merger = GlobalMerger::new(k, tie_break)?;
    let (tx, rx) = funnel();

    thread::scope(|s| -> Result<StageOutput<I>> {
        let merging = s.spawn(move || -> RankResult<_> {
            merger.consume_funnel(rx)?;
            Ok(merger.finish())
        });

        // Every sender clone lives inside `map_with`; once the iterator is done
        // they are all dropped and the merger sees the end of the stream.
        let locals = with_pool(threads, move || {
            partitions
                .into_par_iter()
                .enumerate()
                .map_with(tx, |tx, (idx, part)| aggregate_partition(idx, k, part, tx))
                .collect::<RankResult<Vec<PartitionStats>>>()
        });

        let merged = merging
            .join()
            .map_err(|_| anyhow!("global merger thread panicked"))?;
        // A merger failure closes the funnel, so it is the cause of any
        // FunnelClosed reported by the partitions.
        let (ranked, merge) = merged?;
        let stats = locals??;
        Ok((ranked, stats, merge))
    })
}

/// Run `f` on a dedicated pool of `threads` workers, or on rayon's global pool.
fn with_pool<R, F>(threads: Option<usize>, f: F) -> Result<R>
where
    R: Send,
    F: FnOnce() -> R + Send,
{
    match threads {
        Some(t) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(t)
                .build()
                .with_context(|| format!("build rayon pool with {t} threads"))?;
            Ok(pool.install(f))
        }
        None => Ok(f()),
    }
}

/// Split a Vec into at most `n` contiguous partitions, preserving order.
fn split_vec<T>(v: Vec<T>, n: usize) -> Vec<Vec<T>> {
    let len = v.len();
    if n <= 1 || len <= 1 {
        return vec![v];
    }
    let chunk = len.div_ceil(n.min(len));
    let mut out = Vec::with_capacity(n.min(len));
    let mut it = v.into_iter().peekable();
    while it.peek().is_some() {
        out.push(it.by_ref().take(chunk).collect());
    }
    out
}
