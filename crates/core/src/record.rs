// Copyright 2025 Benchplot Contributors
// SPDX-License-Identifier: Apache-2.0

//! Structured benchmark records.
//!
//! Field names on the wire match the JSON written by earlier tooling
//! (`min_microseconds`, `median_microseconds`, ...), so previously saved
//! result files stay readable.

use serde::{Deserialize, Serialize};

/// One statistical summary of a benchmark run, canonicalized to microseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingSample {
    /// Raw benchmark name as reported by the tool.
    #[serde(rename = "name")]
    pub identity: String,
    /// Lower bound of the reported interval.
    #[serde(rename = "min_microseconds")]
    pub min_us: f64,
    /// Point estimate; the only figure used for comparison.
    #[serde(rename = "median_microseconds")]
    pub median_us: f64,
    /// Upper bound of the reported interval.
    #[serde(rename = "max_microseconds")]
    pub max_us: f64,
}

impl TimingSample {
    /// Create a new timing sample.
    pub fn new(identity: impl Into<String>, min_us: f64, median_us: f64, max_us: f64) -> Self {
        Self {
            identity: identity.into(),
            min_us,
            median_us,
            max_us,
        }
    }

    /// Whether `min <= median <= max` holds.
    ///
    /// Not enforced at parse time; malformed tool output may violate it.
    pub fn is_ordered(&self) -> bool {
        self.min_us <= self.median_us && self.median_us <= self.max_us
    }
}

/// Size companion fact for an identity, in kibibytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeSample {
    /// Raw benchmark name the size line was emitted for.
    #[serde(rename = "name")]
    pub identity: String,
    /// Size in kibibytes.
    pub size_kb: f64,
}

impl SizeSample {
    /// Create a new size sample.
    pub fn new(identity: impl Into<String>, size_kb: f64) -> Self {
        Self {
            identity: identity.into(),
            size_kb,
        }
    }
}

/// The aggregated, display-ready unit produced by one parse pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    /// Identity with its recognized family prefix stripped.
    pub display_name: String,
    /// Category label of the matched family, `None` when unclassified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Timing summary (required).
    pub timing: TimingSample,
    /// Optional size fact associated by identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<SizeSample>,
}

impl BenchmarkRecord {
    /// Raw identity of the record.
    pub fn identity(&self) -> &str {
        &self.timing.identity
    }

    /// Median time in microseconds.
    pub fn median_us(&self) -> f64 {
        self.timing.median_us
    }

    /// Size in kibibytes, if a size line was associated.
    pub fn size_kb(&self) -> Option<f64> {
        self.size.as_ref().map(|s| s.size_kb)
    }
}
