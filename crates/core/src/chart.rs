// Copyright 2025 Benchplot Contributors
// SPDX-License-Identifier: Apache-2.0

//! Tabular projection of records for a rendering backend.

use serde::{Deserialize, Serialize};

use crate::record::BenchmarkRecord;

/// Ratio of largest to smallest positive value above which a logarithmic
/// axis is used.
pub const LOG_SCALE_RATIO: f64 = 10.0;

/// Which figure of a record is charted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSelector {
    /// Median time in microseconds.
    MedianTime,
    /// Size in kibibytes.
    Size,
}

impl ValueSelector {
    /// Selected value of `record`, `None` when absent.
    pub fn select(self, record: &BenchmarkRecord) -> Option<f64> {
        match self {
            ValueSelector::MedianTime => Some(record.median_us()),
            ValueSelector::Size => record.size_kb(),
        }
    }

    /// Short metric name, used in file names and captions.
    pub fn metric(self) -> &'static str {
        match self {
            ValueSelector::MedianTime => "time",
            ValueSelector::Size => "size",
        }
    }
}

/// A second figure per bar, aligned with [`ChartData::names`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondaryValues {
    /// Figure the values were taken from.
    pub selector: ValueSelector,
    /// Values; absent ones are `0.0`.
    pub values: Vec<f64>,
}

/// Minimal dataset handed to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    /// Bar labels, in caller order.
    pub names: Vec<String>,
    /// Values aligned with `names`; absent values are `0.0`.
    pub values: Vec<f64>,
    /// Optional second figure per bar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<SecondaryValues>,
    /// Whether a logarithmic axis is warranted.
    pub log_scale: bool,
    /// Figure the values were taken from.
    pub selector: ValueSelector,
}

impl ChartData {
    /// Project `records` through `selector`, preserving their order.
    pub fn build(records: &[BenchmarkRecord], selector: ValueSelector) -> Self {
        let names = records.iter().map(|r| r.display_name.clone()).collect();
        let values: Vec<f64> = records
            .iter()
            .map(|r| selector.select(r).unwrap_or(0.0))
            .collect();
        let log_scale = wants_log_scale(&values);

        Self {
            names,
            values,
            secondary: None,
            log_scale,
            selector,
        }
    }

    /// Attach a second figure per bar, e.g. size next to time.
    pub fn with_secondary(mut self, records: &[BenchmarkRecord], selector: ValueSelector) -> Self {
        self.secondary = Some(SecondaryValues {
            selector,
            values: records
                .iter()
                .map(|r| selector.select(r).unwrap_or(0.0))
                .collect(),
        });
        self
    }

    /// Number of bars.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Largest value, `0.0` when empty.
    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    /// Secondary value of bar `index`, if present and positive.
    pub fn secondary_at(&self, index: usize) -> Option<(ValueSelector, f64)> {
        let secondary = self.secondary.as_ref()?;
        let value = *secondary.values.get(index)?;
        (value > 0.0).then_some((secondary.selector, value))
    }

    /// Smallest positive value, if any.
    pub fn min_positive(&self) -> Option<f64> {
        positive_range(&self.values).map(|(min, _)| min)
    }
}

fn positive_range(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| *v > 0.0)
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Whether max/min over the positive `values` exceeds [`LOG_SCALE_RATIO`].
pub fn wants_log_scale(values: &[f64]) -> bool {
    match positive_range(values) {
        Some((min, max)) => max / min > LOG_SCALE_RATIO,
        None => false,
    }
}

/// Stable ascending sort of `records` by the selected value; absent values
/// sort first as `0.0`.
pub fn sort_ascending(records: &mut [BenchmarkRecord], selector: ValueSelector) {
    records.sort_by(|a, b| {
        let a = selector.select(a).unwrap_or(0.0);
        let b = selector.select(b).unwrap_or(0.0);
        a.total_cmp(&b)
    });
}
