//! Error types for the ranking core.
//!
//! The bounded structure, the local aggregator and the global merger only ever
//! fail on a bad record, a bad capacity, or a funnel whose merger is gone. Everything above them (runner, I/O,
//! config loading) works in [`anyhow::Result`] and converts these via `?`.

use thiserror::Error;

/// Result type for ranking operations
pub type RankResult<T> = Result<T, RankError>;

/// Errors raised by the ranking core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RankError {
    /// A score was negative or could not be read as an integer.
    #[error("invalid score {raw:?} for item {item}: scores must be non-negative integers")]
    InvalidScore { item: String, raw: String },

    /// The configured capacity is below 1.
    #[error("invalid capacity k={0}: capacity must be at least 1")]
    Capacity(usize),

    /// A text record had no score column.
    #[error("malformed record {0:?}: expected `item<TAB>score`")]
    MalformedRecord(String),

    /// The merger went away before a partition finished forwarding.
    #[error("funnel closed: partition {partition} could not forward {unsent} candidate(s)")]
    FunnelClosed { partition: usize, unsent: usize },
}

impl RankError {
    /// Build an `InvalidScore` from any displayable item and raw score.
    pub fn invalid_score<I: std::fmt::Debug, S: ToString>(item: &I, raw: S) -> Self {
        Self::InvalidScore {
            item: format!("{item:?}"),
            raw: raw.to_string(),
        }
    }
}

/// Reject a capacity below 1.
///
/// # Errors
/// Returns [`RankError::Capacity`] when `k == 0`.
pub const fn check_capacity(k: usize) -> RankResult<usize> {
    if k == 0 {
        Err(RankError::Capacity(k))
    } else {
        Ok(k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_zero_is_rejected() {
        assert_eq!(check_capacity(0), Err(RankError::Capacity(0)));
        assert_eq!(check_capacity(3), Ok(3));
    }

    #[test]
    fn invalid_score_message_names_item_and_raw() {
        let err = RankError::invalid_score(&"apple", -4);
        let msg = err.to_string();
        assert!(msg.contains("\"apple\""));
        assert!(msg.contains("-4"));
    }
}
