//! Partition discovery from file globs.
//!
//! Upstream jobs usually leave one output file per worker
//! (`counts/part-00000`, `counts/part-00001`, ...). Each matching file becomes
//! one partition, and so one local aggregator.
//!
//! # Examples
//!
//! ```no_run
//! use ironrank::io::glob::read_partitions;
//! use ironrank::{RankConfig, Runner};
//!
//! let partitions = read_partitions("counts/part-*")?;
//! let outcome = Runner::new(RankConfig::new(3))?.run(partitions)?;
//! # use anyhow::Error; Ok::<(), Error>(())
//! ```

use crate::scored::ScoredItem;
use anyhow::{Context, Result, bail};
use glob::glob;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Expand a glob pattern into a sorted vector of matching file paths.
///
/// Directories are ignored. Zero matches is not an error here.
///
/// # Errors
/// Returns an error for an invalid pattern or an unreadable glob entry.
pub fn expand_glob(pattern: &str) -> Result<Vec<PathBuf>> {
    let paths = glob(pattern).with_context(|| format!("invalid glob pattern: {pattern}"))?;

    let mut result = Vec::new();
    for entry in paths {
        let path =
            entry.with_context(|| format!("error reading glob entry for pattern: {pattern}"))?;
        if path.is_file() {
            result.push(path);
        }
    }

    // Sorted so partition indices are stable across runs.
    result.sort();
    Ok(result)
}

/// Like [`expand_glob`], but zero matches is an error.
///
/// # Errors
/// Returns an error for an invalid pattern or when no file matches.
pub fn expand_partitions(pattern: &str) -> Result<Vec<PathBuf>> {
    let files = expand_glob(pattern)?;
    if files.is_empty() {
        bail!("no partition files found matching pattern: {pattern}");
    }
    Ok(files)
}

/// Read one partition file. Files ending in `.jsonl` are read as JSON Lines;
/// anything else as `item<TAB>score` text.
///
/// # Errors
/// Returns an error if the file cannot be read or holds a bad record.
pub fn read_partition(path: impl AsRef<Path>) -> Result<Vec<ScoredItem<String>>> {
    let path = path.as_ref();
    let is_jsonl = path.extension().is_some_and(|e| e == "jsonl");
    if is_jsonl {
        read_jsonl_partition(path)
    } else {
        crate::io::text::read_scored_text(path)
    }
}

#[cfg(feature = "io-jsonl")]
fn read_jsonl_partition(path: &Path) -> Result<Vec<ScoredItem<String>>> {
    crate::io::jsonl::read_scored_jsonl(path)
}

#[cfg(not(feature = "io-jsonl"))]
fn read_jsonl_partition(path: &Path) -> Result<Vec<ScoredItem<String>>> {
    bail!("{}: JSONL input needs the `io-jsonl` feature", path.display())
}

/// Read every file matching `pattern`, one partition per file, in sorted path
/// order.
///
/// # Errors
/// Returns an error if nothing matches or any file fails to read.
pub fn read_partitions(pattern: &str) -> Result<Vec<Vec<ScoredItem<String>>>> {
    let files = expand_partitions(pattern)?;
    let mut parts = Vec::with_capacity(files.len());
    for (idx, file) in files.iter().enumerate() {
        let part = read_partition(file)?;
        if part.is_empty() {
            warn!(partition = idx, file = %file.display(), "empty partition file");
        }
        debug!(partition = idx, file = %file.display(), records = part.len(), "partition loaded");
        parts.push(part);
    }
    Ok(parts)
}
