//! JSON Lines (JSONL) records.
//!
//! Scored items and candidates serialize as `{"item": ..., "score": ...}`, one
//! per line. Candidates can be spilled here between the two stages and read
//! back with [`read_candidates_jsonl`].
//!
//! # Notes
//! - Empty/whitespace-only lines are skipped on read.
//! - Negative scores deserialize fine; they are rejected when offered to either
//!   stage, like any other record.

use crate::scored::{Candidate, ScoredItem};
use anyhow::{Context, Result};
use serde::{Serialize, de::DeserializeOwned};
use std::fs::{File, create_dir_all};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Read a JSONL file into a typed `Vec<T>`.
///
/// # Errors
/// Returns an error if the file cannot be opened, read, or if any line fails
/// to parse into `T`. Errors include the line number.
pub fn read_jsonl_vec<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Vec<T>> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut out = Vec::<T>::new();
    for (i, line) in BufReader::new(f).lines().enumerate() {
        let line = line.with_context(|| format!("read line {} in {}", i + 1, path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        let v: T = serde_json::from_str(&line).with_context(|| {
            format!("parse JSONL line {} in {}: {}", i + 1, path.display(), line)
        })?;
        out.push(v);
    }
    Ok(out)
}

/// Write a slice as JSONL, creating parent directories as needed.
///
/// # Returns
/// The number of items written.
///
/// # Errors
/// Returns an error if the file/dirs cannot be created or any item fails to
/// serialize/flush.
pub fn write_jsonl_vec<T: Serialize>(path: impl AsRef<Path>, data: &[T]) -> Result<usize> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        create_dir_all(parent).with_context(|| format!("mkdir -p {}", parent.display()))?;
    }
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(f);
    for (i, item) in data.iter().enumerate() {
        serde_json::to_writer(&mut w, item)
            .with_context(|| format!("serialize item #{} to {}", i, path.display()))?;
        w.write_all(b"\n")?;
    }
    w.flush()?;
    Ok(data.len())
}

/// Read `(item, score)` records from JSONL.
///
/// # Errors
/// See [`read_jsonl_vec`].
pub fn read_scored_jsonl<I: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Vec<ScoredItem<I>>> {
    read_jsonl_vec(path)
}

/// Read spilled candidates from JSONL.
///
/// # Errors
/// See [`read_jsonl_vec`].
pub fn read_candidates_jsonl<I: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Vec<Candidate<I>>> {
    read_jsonl_vec(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_read_back_from_scored_file() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let file = tmp.path().join("nested/cands.jsonl");
        let scored = vec![
            ScoredItem::new("a".to_string(), 3),
            ScoredItem::new("b".to_string(), 1),
        ];
        assert_eq!(write_jsonl_vec(&file, &scored)?, 2);

        let back: Vec<Candidate<String>> = read_candidates_jsonl(&file)?;
        assert_eq!(back[0], Candidate::new("a".to_string(), 3));
        assert_eq!(back.len(), 2);
        Ok(())
    }
}
