//! Scored records flowing through the two ranking stages.
//!
//! - [`ScoredItem`] is the `(item, score)` pair read from a partition and also the
//!   shape of the final ranked output.
//! - [`Candidate`] is a `ScoredItem` that survived local pruning and is on its way
//!   to the global merger.
//! - [`Identifier`] is the bound every item type must satisfy.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display};

/// Integer score attached to an item. Valid scores are non-negative; negative
/// values are rejected when offered to a [`BoundedTopK`](crate::BoundedTopK).
pub type Score = i64;

/// Bound for item identifiers: opaque, comparable, and safe to move across
/// partition workers.
pub trait Identifier: 'static + Send + Sync + Clone + Ord + Debug {}
impl<T> Identifier for T where T: 'static + Send + Sync + Clone + Ord + Debug {}

/// An immutable `(item, score)` pair.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoredItem<I> {
    item: I,
    score: Score,
}

impl<I> ScoredItem<I> {
    #[must_use]
    pub const fn new(item: I, score: Score) -> Self {
        Self { item, score }
    }

    #[must_use]
    pub const fn item(&self) -> &I {
        &self.item
    }

    #[must_use]
    pub const fn score(&self) -> Score {
        self.score
    }

    /// Split into `(item, score)`.
    #[must_use]
    pub fn into_parts(self) -> (I, Score) {
        (self.item, self.score)
    }
}

impl<I> From<(I, Score)> for ScoredItem<I> {
    fn from((item, score): (I, Score)) -> Self {
        Self::new(item, score)
    }
}

impl<I: Display> Display for ScoredItem<I> {
    /// Line-sink form: `item<TAB>score`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.item, self.score)
    }
}

/// A [`ScoredItem`] re-emitted by a local aggregator after pruning.
///
/// Structurally identical to `ScoredItem`; the wrapper only marks which side of
/// the funnel a record is on. Serializes transparently so candidates can be
/// spilled as plain JSONL records.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Candidate<I>(ScoredItem<I>);

impl<I> Candidate<I> {
    #[must_use]
    pub const fn new(item: I, score: Score) -> Self {
        Self(ScoredItem::new(item, score))
    }

    #[must_use]
    pub const fn item(&self) -> &I {
        self.0.item()
    }

    #[must_use]
    pub const fn score(&self) -> Score {
        self.0.score()
    }

    #[must_use]
    pub fn into_scored(self) -> ScoredItem<I> {
        self.0
    }
}

impl<I> From<ScoredItem<I>> for Candidate<I> {
    fn from(s: ScoredItem<I>) -> Self {
        Self(s)
    }
}
