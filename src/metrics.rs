//! Per-stage counters and the run report.
//!
//! Each stage returns its own counters by value when it finishes; the runner
//! folds them into a [`RunMetrics`]. Nothing here is shared between threads
//! while a run is in flight.
//!
//! # Example
//!
//! ```no_run
//! use ironrank::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let runner = Runner::new(RankConfig::new(3))?;
//! let outcome = runner.run(vec![vec![ScoredItem::new("a".to_string(), 5)]])?;
//!
//! outcome.metrics.print();
//! outcome.metrics.save_to_file("metrics.json")?;
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

/// Counters for one local aggregator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionStats {
    /// Partition index within the run.
    pub partition: usize,
    /// Records offered to the local structure.
    pub records: u64,
    /// Score groups evicted on overflow.
    pub evicted_groups: u64,
    /// Items dropped together with evicted groups.
    pub evicted_items: u64,
    /// Candidates forwarded to the funnel.
    pub candidates: u64,
}

/// Counters for the global merger.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeStats {
    /// Candidates received from the funnel.
    pub candidates: u64,
    pub evicted_groups: u64,
    pub evicted_items: u64,
    /// Items still held when the stream ended (may exceed `k` because of ties).
    pub retained_items: u64,
    /// Items written to the ranked output.
    pub emitted: u64,
}

/// Everything measured during one run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMetrics {
    pub k: usize,
    pub partitions: Vec<PartitionStats>,
    pub merge: MergeStats,
    #[serde(with = "duration_ms")]
    pub elapsed: Duration,
}

impl RunMetrics {
    /// Records offered across all partitions.
    #[must_use]
    pub fn total_records(&self) -> u64 {
        self.partitions.iter().map(|p| p.records).sum()
    }

    /// Candidates forwarded across all partitions.
    #[must_use]
    pub fn total_candidates(&self) -> u64 {
        self.partitions.iter().map(|p| p.candidates).sum()
    }

    /// Items pruned locally, across all partitions.
    #[must_use]
    pub fn locally_evicted_items(&self) -> u64 {
        self.partitions.iter().map(|p| p.evicted_items).sum()
    }

    /// Report as a JSON object, with the derived totals added.
    ///
    /// # Errors
    ///
    /// Returns an error if the metrics cannot be serialized.
    pub fn to_json(&self) -> Result<Value> {
        let mut v = serde_json::to_value(self).context("serialize run metrics")?;
        if let Value::Object(map) = &mut v {
            map.insert("total_records".into(), self.total_records().into());
            map.insert("total_candidates".into(), self.total_candidates().into());
        }
        Ok(v)
    }

    /// Print a human-readable summary to stdout.
    pub fn print(&self) {
        println!("\n========== Ranking Metrics ==========");
        println!(
            "Execution Time: {:.3}s ({} ms)",
            self.elapsed.as_secs_f64(),
            self.elapsed.as_millis()
        );
        println!("-------------------------------------");
        println!("k: {}", self.k);
        println!("partitions: {}", self.partitions.len());
        println!("records: {}", self.total_records());
        println!("locally evicted items: {}", self.locally_evicted_items());
        println!("candidates: {}", self.total_candidates());
        println!("merger evicted items: {}", self.merge.evicted_items);
        println!("emitted: {}", self.merge.emitted);
        println!("=====================================\n");
    }

    /// Save the JSON report to `path`, pretty-printed.
    ///
    /// # Errors
    ///
    /// Returns an error if the metrics cannot be serialized, or if the file
    /// cannot be created or written to.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let formatted = serde_json::to_string_pretty(&self.to_json()?)?;
        let mut file = File::create(path).with_context(|| format!("create {}", path.display()))?;
        file.write_all(formatted.as_bytes())
            .with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[allow(clippy::cast_possible_truncation)]
    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
