//! Line-oriented text records: `item<TAB>score`, one per line.
//!
//! This is the format the upstream counting stage writes, and the format the
//! ranked output is written back in.
//!
//! # Notes
//! - The score is the last tab-separated column; if a line has no tab, the last
//!   whitespace-separated token is used instead.
//! - Empty/whitespace-only lines are skipped on read.
//! - A score that is not an integer, or is negative, fails with
//!   [`RankError::InvalidScore`]; the error context names the file and line.

use crate::error::{RankError, RankResult};
use crate::scored::{Score, ScoredItem};
use anyhow::{Context, Result};
use std::fmt::Display;
use std::fs::{File, create_dir_all};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Parse one line. Returns `Ok(None)` for a blank line.
///
/// # Errors
/// - [`RankError::MalformedRecord`] when there is no score column or no item.
/// - [`RankError::InvalidScore`] when the score is non-numeric or negative.
pub fn parse_record(line: &str) -> RankResult<Option<ScoredItem<String>>> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Ok(None);
    }
    let (item, raw) = line
        .rsplit_once('\t')
        .or_else(|| line.trim().rsplit_once(char::is_whitespace))
        .ok_or_else(|| RankError::MalformedRecord(line.to_string()))?;
    let item = item.trim();
    let raw = raw.trim();
    if item.is_empty() {
        return Err(RankError::MalformedRecord(line.to_string()));
    }
    let score: Score = raw
        .parse()
        .map_err(|_| RankError::invalid_score(&item, raw))?;
    if score < 0 {
        return Err(RankError::invalid_score(&item, raw));
    }
    Ok(Some(ScoredItem::new(item.to_string(), score)))
}

/// Read every record from a reader, with `source` used in error context.
///
/// # Errors
/// Returns an error on I/O failure or on the first bad record.
pub fn read_scored<R: BufRead>(reader: R, source: &str) -> Result<Vec<ScoredItem<String>>> {
    let mut out = Vec::new();
    let mut skipped = 0usize;
    for (i, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("read line {} in {source}", i + 1))?;
        match parse_record(&line).with_context(|| format!("line {} in {source}", i + 1))? {
            Some(rec) => out.push(rec),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        debug!(source, skipped, "blank lines skipped");
    }
    Ok(out)
}

/// Read a text file of `item<TAB>score` lines.
///
/// # Errors
/// Returns an error if the file cannot be opened or read, or on the first bad
/// record (with the line number in the context).
pub fn read_scored_text(path: impl AsRef<Path>) -> Result<Vec<ScoredItem<String>>> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    read_scored(BufReader::new(f), &path.display().to_string())
}

/// Read a text file and slice it into partitions of `lines_per_partition`
/// records each (the last one may be shorter). A zero size is treated as one.
///
/// # Errors
/// See [`read_scored_text`].
pub fn read_scored_text_partitioned(
    path: impl AsRef<Path>,
    lines_per_partition: usize,
) -> Result<Vec<Vec<ScoredItem<String>>>> {
    let records = read_scored_text(path)?;
    let size = lines_per_partition.max(1);
    let mut parts = Vec::with_capacity(records.len().div_ceil(size));
    let mut it = records.into_iter().peekable();
    while it.peek().is_some() {
        parts.push(it.by_ref().take(size).collect());
    }
    Ok(parts)
}

/// Write ranked output as `item<TAB>score` lines.
///
/// # Errors
/// Returns an error if writing or flushing fails.
pub fn write_scored<W: Write, I: Display>(writer: W, ranked: &[ScoredItem<I>]) -> Result<usize> {
    let mut w = BufWriter::new(writer);
    for rec in ranked {
        writeln!(w, "{rec}")?;
    }
    w.flush()?;
    Ok(ranked.len())
}

/// Write ranked output to a file, creating parent directories as needed.
///
/// # Returns
/// The number of lines written.
///
/// # Errors
/// Returns an error if the file/dirs cannot be created or written.
pub fn write_scored_text<I: Display>(path: impl AsRef<Path>, ranked: &[ScoredItem<I>]) -> Result<usize> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        create_dir_all(parent).with_context(|| format!("mkdir -p {}", parent.display()))?;
    }
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    write_scored(f, ranked).with_context(|| format!("write {}", path.display()))
}
