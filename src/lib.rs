//! # ironrank
//!
//! **Two-stage bounded top-K selection** over partitioned `(item, score)` streams.
//!
//! Each partition keeps only its highest-scoring K *score groups*, forwards what it
//! kept as candidates through a single funnel, and one global merger turns the
//! union of all candidates into a ranked list of exactly (at most) K *items*.
//!
//! ## Key Features
//!
//! - **Bounded memory** - every stage holds at most K distinct scores
//! - **Tie groups** - items with equal scores are kept or evicted together
//! - **Sequential and parallel execution** - local stages on rayon, the merger on
//!   its own thread behind a many-to-one channel
//! - **Text and JSONL I/O** - `item<TAB>score` lines in and out, JSONL spills,
//!   glob-based partition discovery
//! - **Run metrics** - per-partition and merge counters, printable or saved as JSON
//!
//! ## Quick Start
//!
//! ```
//! use ironrank::*;
//! # use anyhow::Result;
//!
//! # fn main() -> Result<()> {
//! let runner = Runner::new(RankConfig::new(3).sequential())?;
//!
//! let partition = vec![
//!     ScoredItem::new("a", 5),
//!     ScoredItem::new("b", 3),
//!     ScoredItem::new("c", 8),
//!     ScoredItem::new("d", 1),
//!     ScoredItem::new("e", 8),
//! ];
//!
//! let outcome = runner.run(vec![partition])?;
//! let top: Vec<(&str, i64)> = outcome
//!     .ranked
//!     .iter()
//!     .map(|s| (*s.item(), s.score()))
//!     .collect();
//! assert_eq!(top, vec![("c", 8), ("e", 8), ("a", 5)]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Concepts
//!
//! ### BoundedTopK
//!
//! [`BoundedTopK`] maps scores to the items sharing them and never holds more than
//! K distinct scores. When an offer creates the (K+1)-th score, the lowest score
//! group is dropped whole. Since ties share a group, it can hold more than K items.
//!
//! ### Local aggregation
//!
//! A [`LocalAggregator`] runs once per partition and emits everything its
//! `BoundedTopK` still holds as [`Candidate`]s. This stage is an approximation:
//! scores are not combined across partitions before pruning, so an item split
//! over several partitions can be dropped everywhere even if its combined score
//! would rank. That loss is part of the contract.
//!
//! ### Global merge
//!
//! The single [`GlobalMerger`] offers every candidate into its own `BoundedTopK`,
//! then walks groups from the highest score down and stops as soon as K items
//! have been emitted, even mid-group. [`TieBreak`] controls the order inside a
//! group cut at the boundary.
//!
//! ## Errors
//!
//! The core fails with [`RankError::InvalidScore`] (negative or non-numeric
//! score, per record) and [`RankError::Capacity`] (K < 1, at configuration time).
//! A partition whose merger has gone away fails with [`RankError::FunnelClosed`]
//! rather than dropping candidates silently. Any K ≥ 1 is accepted; storage
//! grows with the scores actually seen. Runner and I/O functions return
//! [`anyhow::Result`] with file/line context.
//!
//! ## Logging
//!
//! Stages log through [`tracing`]: `info` per run, `debug` per partition and
//! merge, `warn` for empty inputs. Install any subscriber to see them.
//!
//! ## Module Overview
//!
//! - [`combiners`] - `BoundedTopK` and `ScoreGroup`
//! - [`aggregate`] - the per-partition local stage
//! - [`merge`] - the global merger and tie-break policy
//! - [`funnel`] - the many-to-one candidate channel
//! - [`runner`] - sequential and parallel execution
//! - [`config`] - run configuration
//! - [`metrics`] - run counters and reports
//! - [`io`] - text, JSONL and glob input/output
//! - [`testing`] - assertions and fixtures

pub mod aggregate;
pub mod combiners;
pub mod config;
pub mod error;
pub mod funnel;
pub mod io;
pub mod merge;
pub mod metrics;
pub mod runner;
pub mod scored;
pub mod testing;

// General re-exports
pub use aggregate::{LocalAggregator, aggregate_partition};
pub use combiners::{BoundedTopK, ScoreGroup};
pub use config::{ExecMode, RankConfig};
pub use error::{RankError, RankResult};
pub use funnel::{FunnelReceiver, FunnelSender, funnel};
pub use merge::{GlobalMerger, TieBreak, merge_candidates};
pub use metrics::{MergeStats, PartitionStats, RunMetrics};
pub use runner::{RankOutcome, Runner};
pub use scored::{Candidate, Identifier, Score, ScoredItem};

pub use io::glob::read_partitions;
pub use io::text::{read_scored_text, write_scored_text};

// Gated re-exports
#[cfg(feature = "io-jsonl")]
pub use io::jsonl::{read_candidates_jsonl, read_scored_jsonl, write_jsonl_vec};
