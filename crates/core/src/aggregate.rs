// Copyright 2025 Benchplot Contributors
// SPDX-License-Identifier: Apache-2.0

//! Result aggregation.
//!
//! The aggregator walks the text line by line with a two-state machine:
//!
//! ```text
//!            BareName(n)                     TimingOnly
//!   Idle ───────────────> AwaitingTiming(n) ───────────> Idle   (record n)
//!    │ ^                   │   │ BareName(m): pending n is dropped, await m
//!    │ └───────────────────┘   │ NamedTiming(m): record m, pending n is dropped
//!    │     NamedTiming(m)      ├ FileSize / Unrecognized: unchanged
//!    │                         └ timing line with bad unit: pending n is dropped, Idle
//!    └ TimingOnly in Idle: ignored
//! ```
//!
//! Timings are keyed by identity with last-write-wins; a record keeps the
//! position of the identity's first appearance. Sizes are collected
//! separately and attached at the end of the pass.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::category::FamilyRegistry;
use crate::classify::{classify, is_timing_line, LineKind, TimingBlock};
use crate::error::{ParseError, Result};
use crate::record::{BenchmarkRecord, SizeSample, TimingSample};

/// State of the pending-name tracker.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ParseState {
    /// No name is waiting for a timing line.
    #[default]
    Idle,
    /// A bare name was seen; the next timing-only line belongs to it.
    AwaitingTiming(String),
}

/// Why a line was dropped from the pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// A recognized line carried an unknown unit.
    UnsupportedUnit(String),
    /// A timing-only line arrived with no pending name.
    OrphanTiming,
    /// A pending name was replaced before its timing arrived.
    PendingNameReplaced(String),
    /// The timing line following a pending name was discarded, so the name
    /// is dropped with it.
    PendingTimingDiscarded(String),
}

/// A discarded line and the reason it was discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number in the input text.
    pub line_number: usize,
    /// Reason the line was dropped.
    pub reason: SkipReason,
}

/// Records of a pass together with its per-line diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    /// Aggregated records in first-seen order.
    pub records: Vec<BenchmarkRecord>,
    /// Lines that were dropped.
    pub skipped: Vec<SkippedLine>,
}

/// Accumulators for a single pass. Never shared between passes.
#[derive(Default)]
struct Pass {
    state: ParseState,
    order: Vec<String>,
    timings: HashMap<String, TimingSample>,
    sizes: HashMap<(String, String), SizeSample>,
    skipped: Vec<SkippedLine>,
}

impl Pass {
    fn skip(&mut self, line_number: usize, reason: SkipReason) {
        debug!(line_number, ?reason, "Skipping line");
        self.skipped.push(SkippedLine {
            line_number,
            reason,
        });
    }

    fn discard_timing_line(&mut self, line_number: usize) {
        if let ParseState::AwaitingTiming(pending) = std::mem::take(&mut self.state) {
            self.skip(line_number, SkipReason::PendingTimingDiscarded(pending));
        }
    }

    fn record_timing(&mut self, identity: String, block: TimingBlock) {
        let sample = TimingSample::new(
            identity.clone(),
            block.min_us,
            block.median_us,
            block.max_us,
        );
        if self.timings.insert(identity.clone(), sample).is_some() {
            debug!(%identity, "Replacing earlier observation");
        } else {
            self.order.push(identity);
        }
    }

    fn step(&mut self, line_number: usize, kind: LineKind, registry: &FamilyRegistry) {
        let state = std::mem::take(&mut self.state);
        self.state = match (state, kind) {
            (state, LineKind::FileSize { identity, size_kb }) => {
                let key = association_key(&identity, registry);
                self.sizes.insert(key, SizeSample::new(identity, size_kb));
                state
            }
            (state, LineKind::NamedTiming { identity, timing }) => {
                if let ParseState::AwaitingTiming(pending) = state {
                    self.skip(line_number, SkipReason::PendingNameReplaced(pending));
                }
                self.record_timing(identity, timing);
                ParseState::Idle
            }
            (state, LineKind::BareName { identity }) => {
                if let ParseState::AwaitingTiming(pending) = state {
                    self.skip(line_number, SkipReason::PendingNameReplaced(pending));
                }
                ParseState::AwaitingTiming(identity)
            }
            (ParseState::AwaitingTiming(pending), LineKind::TimingOnly(timing)) => {
                self.record_timing(pending, timing);
                ParseState::Idle
            }
            (ParseState::Idle, LineKind::TimingOnly(_)) => {
                self.skip(line_number, SkipReason::OrphanTiming);
                ParseState::Idle
            }
            (state, LineKind::Unrecognized) => state,
        };
    }

    fn finish(mut self, registry: &FamilyRegistry) -> Result<ParseOutcome> {
        if let ParseState::AwaitingTiming(pending) = &self.state {
            debug!(identity = %pending, "Input ended while awaiting a timing line");
        }

        let mut records = Vec::with_capacity(self.order.len());
        for identity in &self.order {
            let Some(timing) = self.timings.remove(identity) else {
                continue;
            };
            let classification = registry.classify(identity);
            let size = self
                .sizes
                .remove(&association_key(identity, registry));
            records.push(BenchmarkRecord {
                display_name: classification.display_name.to_string(),
                category: classification.family.map(|f| f.label.clone()),
                timing,
                size,
            });
        }

        for size in self.sizes.values() {
            debug!(identity = %size.identity, "Dropping size without timing");
        }

        if records.is_empty() {
            return Err(ParseError::NoResultsParsed);
        }

        info!(
            records = records.len(),
            skipped = self.skipped.len(),
            "Parsed benchmark output"
        );
        Ok(ParseOutcome {
            records,
            skipped: self.skipped,
        })
    }
}

/// Key used to pair size lines with timing lines: category label and
/// prefix-stripped name, so that equal names in different families stay apart.
fn association_key(identity: &str, registry: &FamilyRegistry) -> (String, String) {
    let classification = registry.classify(identity);
    (
        classification.label().to_string(),
        classification.display_name.to_string(),
    )
}

/// Turns captured benchmark output into [`BenchmarkRecord`]s.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    registry: FamilyRegistry,
}

impl Aggregator {
    /// Create an aggregator recognizing the given families.
    pub fn new(registry: FamilyRegistry) -> Self {
        Self { registry }
    }

    /// Families this aggregator recognizes.
    pub fn registry(&self) -> &FamilyRegistry {
        &self.registry
    }

    /// Parse `text` and return one record per distinct timed identity.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::NoResultsParsed`] when no timing was recognized.
    pub fn aggregate(&self, text: &str) -> Result<Vec<BenchmarkRecord>> {
        self.aggregate_with_diagnostics(text).map(|o| o.records)
    }

    /// Like [`Aggregator::aggregate`], also reporting the lines that were dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::NoResultsParsed`] when no timing was recognized.
    pub fn aggregate_with_diagnostics(&self, text: &str) -> Result<ParseOutcome> {
        let mut pass = Pass::default();

        for (index, line) in text.lines().enumerate() {
            let line_number = index + 1;
            match classify(line, &self.registry) {
                Ok(kind) => pass.step(line_number, kind, &self.registry),
                Err(ParseError::UnsupportedUnit(unit)) => {
                    warn!(line_number, %unit, "Unsupported unit, discarding line");
                    pass.skip(line_number, SkipReason::UnsupportedUnit(unit));
                    if is_timing_line(line) {
                        pass.discard_timing_line(line_number);
                    }
                }
                Err(err) => return Err(err),
            }
        }

        pass.finish(&self.registry)
    }
}

/// Parse `text` with the given families.
///
/// # Errors
///
/// Returns [`ParseError::NoResultsParsed`] when no timing was recognized.
pub fn aggregate(text: &str, registry: &FamilyRegistry) -> Result<Vec<BenchmarkRecord>> {
    Aggregator::new(registry.clone()).aggregate(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Family;

    const EXAMPLE: &str = "\
foo_alpha file size: 504036 bytes (492.22 KB)
foo_alpha time:   [900.00 ms 906.48 ms 915.00 ms]
foo_beta
                        time:   [1400.0 ms 1474.3 ms 1500.0 ms]
";

    fn aggregator() -> Aggregator {
        Aggregator::new(FamilyRegistry::parquet_encoding().with(Family::new("foo_", "foo")))
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_end_to_end_example() {
        let records = aggregator().aggregate(EXAMPLE).unwrap();
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].display_name, "alpha");
        assert!(approx(records[0].timing.median_us, 906_480.0));
        assert_eq!(records[0].size_kb(), Some(492.22));
        assert_eq!(records[0].category.as_deref(), Some("foo"));

        assert_eq!(records[1].display_name, "beta");
        assert!(approx(records[1].timing.median_us, 1_474_300.0));
        assert!(records[1].size.is_none());
    }

    #[test]
    fn test_records_are_ordered_samples() {
        for record in aggregator().aggregate(EXAMPLE).unwrap() {
            assert!(record.timing.is_ordered(), "{}", record.identity());
        }
    }

    #[test]
    fn test_empty_input_fails() {
        assert_eq!(aggregator().aggregate(""), Err(ParseError::NoResultsParsed));
        assert_eq!(
            aggregator().aggregate("error: could not compile\n\nwarning: unused\n"),
            Err(ParseError::NoResultsParsed)
        );
    }

    #[test]
    fn test_size_only_fails() {
        let text = "foo_alpha file size: 504036 bytes (492.22 KB)\n";
        assert_eq!(aggregator().aggregate(text), Err(ParseError::NoResultsParsed));
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let agg = aggregator();
        assert_eq!(agg.aggregate(EXAMPLE).unwrap(), agg.aggregate(EXAMPLE).unwrap());
    }

    #[test]
    fn test_last_write_wins() {
        let text = "\
foo_alpha time: [1 ms 2 ms 3 ms]
foo_beta time: [1 ms 1 ms 1 ms]
foo_alpha
    time: [4 ms 5 ms 6 ms]
";
        let records = aggregator().aggregate(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].identity(), "foo_alpha");
        assert_eq!(records[0].timing.median_us, 5_000.0);
        assert_eq!(records[0].timing.min_us, 4_000.0);
        assert_eq!(records[1].identity(), "foo_beta");
    }

    #[test]
    fn test_size_may_follow_timing() {
        let text = "\
decode_varint time: [1 us 2 us 3 us]
decode_varint file size: 2048 bytes (2.00 KB)
decode_varint file size: 4096 bytes (4.00 KB)
";
        let records = aggregator().aggregate(text).unwrap();
        assert_eq!(records[0].size_kb(), Some(4.0));
        assert_eq!(records[0].size.as_ref().unwrap().identity, "decode_varint");
    }

    #[test]
    fn test_size_does_not_cross_families() {
        let text = "\
parquet_encoding_varint file size: 2048 bytes (2.00 KB)
parquet_encoding_varint time: [1 ms 2 ms 3 ms]
decode_varint time: [1 us 2 us 3 us]
";
        let records = aggregator().aggregate(text).unwrap();
        assert_eq!(records[0].size_kb(), Some(2.0));
        assert_eq!(records[1].display_name, "varint");
        assert!(records[1].size.is_none());
    }

    #[test]
    fn test_orphan_timing_is_ignored() {
        let text = "\
    time: [9 ms 9 ms 9 ms]
foo_alpha time: [1 ms 2 ms 3 ms]
    time: [7 ms 7 ms 7 ms]
";
        let outcome = aggregator().aggregate_with_diagnostics(text).unwrap();
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].timing.median_us, 2_000.0);
        let reasons: Vec<_> = outcome.skipped.iter().map(|s| (s.line_number, &s.reason)).collect();
        assert_eq!(
            reasons,
            vec![(1, &SkipReason::OrphanTiming), (3, &SkipReason::OrphanTiming)]
        );
    }

    #[test]
    fn test_second_bare_name_replaces_pending() {
        let text = "\
foo_alpha
foo_beta
    time: [1 ms 2 ms 3 ms]
";
        let outcome = aggregator().aggregate_with_diagnostics(text).unwrap();
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].identity(), "foo_beta");
        assert_eq!(
            outcome.skipped,
            vec![SkippedLine {
                line_number: 2,
                reason: SkipReason::PendingNameReplaced("foo_alpha".to_string()),
            }]
        );
    }

    #[test]
    fn test_named_timing_clears_pending() {
        let text = "\
foo_alpha
foo_beta time: [1 ms 2 ms 3 ms]
    time: [4 ms 5 ms 6 ms]
";
        let records = aggregator().aggregate(text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].identity(), "foo_beta");
    }

    #[test]
    fn test_pending_survives_noise_lines() {
        let text = "\
Benchmarking foo_alpha: Warming up for 3.0000 s
foo_alpha
Benchmarking foo_alpha: Analyzing
foo_alpha file size: 10 bytes (0.01 KB)
                        time:   [1 ms 2 ms 3 ms]
                        change: [-1.0% +0.5% +2.0%] (p = 0.50 > 0.05)
";
        let records = aggregator().aggregate(text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].identity(), "foo_alpha");
        assert_eq!(records[0].size_kb(), Some(0.01));
    }

    #[test]
    fn test_unsupported_unit_discards_only_that_line() {
        let text = "\
foo_alpha time: [1 fortnights 2 ms 3 ms]
foo_beta time: [1 ms 2 ms 3 ms]
";
        let outcome = aggregator().aggregate_with_diagnostics(text).unwrap();
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].identity(), "foo_beta");
        assert_eq!(
            outcome.skipped[0].reason,
            SkipReason::UnsupportedUnit("fortnights".to_string())
        );
    }

    #[test]
    fn test_bad_timing_line_drops_pending_name() {
        let text = "\
foo_alpha
    time: [1 fortnights 2 ms 3 ms]
warm-up noise
    time: [9 ms 9 ms 9 ms]
foo_beta time: [1 ms 2 ms 3 ms]
";
        let outcome = aggregator().aggregate_with_diagnostics(text).unwrap();
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].identity(), "foo_beta");
        let reasons: Vec<_> = outcome.skipped.iter().map(|s| (s.line_number, &s.reason)).collect();
        assert_eq!(
            reasons,
            vec![
                (2, &SkipReason::UnsupportedUnit("fortnights".to_string())),
                (2, &SkipReason::PendingTimingDiscarded("foo_alpha".to_string())),
                (4, &SkipReason::OrphanTiming),
            ]
        );
    }

    #[test]
    fn test_bad_size_line_keeps_pending_name() {
        let text = "\
foo_alpha
foo_alpha file size: 10 bytes (1 furlongs)
    time: [1 ms 2 ms 3 ms]
";
        let records = aggregator().aggregate(text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].identity(), "foo_alpha");
        assert!(records[0].size.is_none());
    }

    #[test]
    fn test_bare_name_without_separator() {
        let text = "\
decoder_lz4
    time: [1 ms 2 ms 3 ms]
decode_varint time: [1 us 2 us 3 us]
";
        let outcome = Aggregator::new(FamilyRegistry::parquet_encoding())
            .aggregate_with_diagnostics(text)
            .unwrap();
        assert!(outcome.skipped.is_empty());
        let names: Vec<_> = outcome
            .records
            .iter()
            .map(|r| (r.identity(), r.display_name.as_str(), r.category.as_deref()))
            .collect();
        assert_eq!(
            names,
            vec![
                ("decoder_lz4", "r_lz4", Some("decode")),
                ("decode_varint", "varint", Some("decode")),
            ]
        );
    }

    #[test]
    fn test_unclassified_names_are_kept() {
        let records = aggregator()
            .aggregate("label_hash/fxhash time: [10 ns 12 ns 14 ns]")
            .unwrap();
        assert_eq!(records[0].display_name, "label_hash/fxhash");
        assert_eq!(records[0].category, None);
    }

    #[test]
    fn test_free_function_matches_aggregator() {
        let registry = FamilyRegistry::parquet_encoding().with(Family::new("foo_", "foo"));
        assert_eq!(
            aggregate(EXAMPLE, &registry).unwrap(),
            aggregator().aggregate(EXAMPLE).unwrap()
        );
    }
}
