// Copyright 2025 Benchplot Contributors
// SPDX-License-Identifier: Apache-2.0

//! Parsing and aggregation engine for micro-benchmark output.
//!
//! Turns the captured text of a Criterion-style benchmark run into
//! structured records, groups them by benchmark family and projects them
//! into small datasets for chart rendering.
//!
//! # Quick Start
//!
//! ```
//! use benchplot_core::{split, Aggregator, ChartData, Family, FamilyRegistry, ValueSelector};
//!
//! let registry = FamilyRegistry::new().with(Family::new("foo_", "foo"));
//! let text = "foo_alpha time:   [900.00 ms 906.48 ms 915.00 ms]\n";
//!
//! let records = Aggregator::new(registry.clone()).aggregate(text).unwrap();
//! let groups = split(&records, &registry);
//! let chart = ChartData::build(&groups[0].records, ValueSelector::MedianTime);
//! assert_eq!(chart.names, vec!["alpha"]);
//! ```
//!
//! # Modules
//!
//! - [`units`] - Time and size unit normalization
//! - [`classify`] - Per-line classification
//! - [`aggregate`] - Pending-name state machine and deduplication
//! - [`category`] - Family registry and category splitting
//! - [`chart`] - Chart datasets and the log-scale decision

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod aggregate;
pub mod category;
pub mod chart;
pub mod classify;
pub mod error;
pub mod record;
pub mod units;

pub use aggregate::{aggregate, Aggregator, ParseOutcome, ParseState, SkipReason, SkippedLine};
pub use category::{split, CategoryGroup, Family, FamilyRegistry, UNCLASSIFIED};
pub use chart::{sort_ascending, ChartData, SecondaryValues, ValueSelector, LOG_SCALE_RATIO};
pub use classify::{classify, LineKind, TimingBlock};
pub use error::{ParseError, Result};
pub use record::{BenchmarkRecord, SizeSample, TimingSample};
pub use units::{normalize, normalize_size};
