//! Bounded containers used by both ranking stages.
//!
//! - [`BoundedTopK<I>`] -- the highest-scoring K score groups, evicting the lowest
//!   group whole on overflow.
//! - [`ScoreGroup<I>`] -- one score and the items tied on it.
//!
//! The local aggregator and the global merger each own exactly one
//! `BoundedTopK`; neither shares it.

mod topk;

pub use topk::{BoundedTopK, ScoreGroup};
