//! Run configuration.
//!
//! `k` has no default and must be given explicitly. Everything else falls back
//! to [`ExecMode::default`] and [`TieBreak::default`].
//!
//! ```
//! use ironrank::{ExecMode, RankConfig, TieBreak};
//!
//! let cfg = RankConfig::from_json_str(
//!     r#"{ "k": 3, "mode": { "type": "parallel", "threads": 4 }, "tie_break": "lexicographic" }"#,
//! )?;
//! assert_eq!(cfg.k, 3);
//! assert_eq!(cfg.mode, ExecMode::Parallel { threads: Some(4), partitions: None });
//! assert_eq!(cfg.tie_break, TieBreak::Lexicographic);
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::error::{RankResult, check_capacity};
use crate::merge::TieBreak;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// How partitions are executed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExecMode {
    /// One partition after another on the calling thread.
    Sequential,
    /// Partitions on a rayon pool; the merger on its own thread.
    ///
    /// - `threads`: pool size, `None` for rayon's default.
    /// - `partitions`: split count used when a flat input must be partitioned,
    ///   `None` for `2 * num_cpus`.
    Parallel {
        #[serde(default)]
        threads: Option<usize>,
        #[serde(default)]
        partitions: Option<usize>,
    },
}

impl Default for ExecMode {
    fn default() -> Self {
        Self::Parallel {
            threads: None,
            partitions: None,
        }
    }
}

/// Everything a [`Runner`](crate::Runner) needs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankConfig {
    /// Capacity in score groups for both stages, and the item limit of the output.
    pub k: usize,
    #[serde(default)]
    pub mode: ExecMode,
    #[serde(default)]
    pub tie_break: TieBreak,
}

impl RankConfig {
    #[must_use]
    pub fn new(k: usize) -> Self {
        Self {
            k,
            mode: ExecMode::default(),
            tie_break: TieBreak::default(),
        }
    }

    #[must_use]
    pub const fn with_mode(mut self, mode: ExecMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub const fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    #[must_use]
    pub const fn sequential(self) -> Self {
        self.with_mode(ExecMode::Sequential)
    }

    /// Reject a capacity below 1.
    ///
    /// # Errors
    /// Returns [`RankError::Capacity`](crate::RankError::Capacity).
    pub fn validate(&self) -> RankResult<()> {
        check_capacity(self.k).map(|_| ())
    }

    /// Parse and validate a JSON document.
    ///
    /// # Errors
    /// Returns an error on malformed JSON or an invalid capacity.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(s).context("parse rank config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load and validate a JSON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is malformed, or has an
    /// invalid capacity.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        Self::from_json_str(&raw).with_context(|| format!("load config {}", path.display()))
    }
}
