//! Persisted benchmark run types.
//!
//! A [`BenchRun`] is the JSON document written for each parse pass. Entries
//! are flat so the files stay easy to consume from other tooling.

use benchplot_core::{BenchmarkRecord, SizeSample, TimingSample};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One benchmark as written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkEntry {
    /// Raw benchmark identity.
    pub name: String,
    /// Identity with its family prefix stripped.
    pub display_name: String,
    /// Category label, absent when unclassified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Lower bound in microseconds.
    pub min_microseconds: f64,
    /// Median in microseconds.
    pub median_microseconds: f64,
    /// Upper bound in microseconds.
    pub max_microseconds: f64,
    /// Associated size in kibibytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_kb: Option<f64>,
}

impl From<&BenchmarkRecord> for BenchmarkEntry {
    fn from(record: &BenchmarkRecord) -> Self {
        Self {
            name: record.timing.identity.clone(),
            display_name: record.display_name.clone(),
            category: record.category.clone(),
            min_microseconds: record.timing.min_us,
            median_microseconds: record.timing.median_us,
            max_microseconds: record.timing.max_us,
            size_kb: record.size_kb(),
        }
    }
}

impl From<&BenchmarkEntry> for BenchmarkRecord {
    fn from(entry: &BenchmarkEntry) -> Self {
        Self {
            display_name: entry.display_name.clone(),
            category: entry.category.clone(),
            timing: TimingSample::new(
                entry.name.clone(),
                entry.min_microseconds,
                entry.median_microseconds,
                entry.max_microseconds,
            ),
            size: entry.size_kb.map(|kb| SizeSample::new(entry.name.clone(), kb)),
        }
    }
}

/// Compact UTC stamp used in artifact file names, e.g. `20251017T093000Z`.
pub fn file_stamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y%m%dT%H%M%SZ").to_string()
}

/// The parsed results of one benchmark run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchRun {
    /// When the run was parsed.
    pub timestamp: DateTime<Utc>,
    /// Benchmarks in parse order.
    pub benchmarks: Vec<BenchmarkEntry>,
}

impl BenchRun {
    /// Create a run stamped with the current time.
    pub fn new(records: &[BenchmarkRecord]) -> Self {
        Self::at(Utc::now(), records)
    }

    /// Create a run with an explicit timestamp.
    pub fn at(timestamp: DateTime<Utc>, records: &[BenchmarkRecord]) -> Self {
        Self {
            timestamp,
            benchmarks: records.iter().map(BenchmarkEntry::from).collect(),
        }
    }

    /// Stamp used in this run's artifact file names.
    pub fn file_stamp(&self) -> String {
        file_stamp(&self.timestamp)
    }

    /// Convert the entries back into records.
    pub fn records(&self) -> Vec<BenchmarkRecord> {
        self.benchmarks.iter().map(BenchmarkRecord::from).collect()
    }
}
