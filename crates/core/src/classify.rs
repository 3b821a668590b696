// Copyright 2025 Benchplot Contributors
// SPDX-License-Identifier: Apache-2.0

//! Line classification.
//!
//! Recognized grammars, tried in this order on the trimmed line:
//!
//! ```text
//! <ident> file size: <int> bytes (<float> KB)        -> FileSize
//! <ident> file size: <int> bytes                     -> FileSize
//! <ident> time: [<f> <unit> <f> <unit> <f> <unit>]   -> NamedTiming
//! <ident>                                            -> BareName (known family only)
//! time: [<f> <unit> <f> <unit> <f> <unit>]           -> TimingOnly
//! ```
//!
//! Anything else, including a matching line whose numbers fail to parse, is
//! [`LineKind::Unrecognized`].

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::category::FamilyRegistry;
use crate::error::Result;
use crate::units;

const TIMING_BLOCK: &str = r"time:\s*\[\s*(?P<min>[0-9][0-9.]*)\s*(?P<min_unit>[A-Za-zµμ]+)\s+(?P<median>[0-9][0-9.]*)\s*(?P<median_unit>[A-Za-zµμ]+)\s+(?P<max>[0-9][0-9.]*)\s*(?P<max_unit>[A-Za-zµμ]+)\s*\]";

static FILE_SIZE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<name>\S+)\s+file size:\s*(?P<bytes>[0-9][0-9.]*)\s*bytes(?:\s*\(\s*(?P<size>[0-9][0-9.]*)\s*(?P<unit>[A-Za-z]+)\s*\))?\s*$",
    )
    .expect("file size pattern is valid")
});

static NAMED_TIMING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^(?P<name>[A-Za-z0-9_/\-\s]+?)\s+{TIMING_BLOCK}"))
        .expect("named timing pattern is valid")
});

static TIMING_ONLY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("^{TIMING_BLOCK}")).expect("timing pattern is valid"));

static BARE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_/\-]+$").expect("bare name pattern is valid"));

/// A `time: [min median max]` block normalized to microseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingBlock {
    /// Lower bound in microseconds.
    pub min_us: f64,
    /// Median in microseconds.
    pub median_us: f64,
    /// Upper bound in microseconds.
    pub max_us: f64,
}

/// What a single line of benchmark output carries.
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind {
    /// `<ident> file size: ...`
    FileSize {
        /// Benchmark identity.
        identity: String,
        /// Size in kibibytes.
        size_kb: f64,
    },
    /// Name and timing on the same line.
    NamedTiming {
        /// Benchmark identity.
        identity: String,
        /// Normalized timing.
        timing: TimingBlock,
    },
    /// A lone name of a known family, awaiting its timing line.
    BareName {
        /// Benchmark identity.
        identity: String,
    },
    /// A timing block without a name.
    TimingOnly(TimingBlock),
    /// Nothing of interest.
    Unrecognized,
}

/// Classify one line of output.
///
/// # Errors
///
/// Returns [`crate::ParseError::UnsupportedUnit`] when a line matches a
/// grammar but carries an unknown unit. The error is local to the line.
pub fn classify(line: &str, registry: &FamilyRegistry) -> Result<LineKind> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(LineKind::Unrecognized);
    }

    if let Some(caps) = FILE_SIZE_RE.captures(line) {
        return file_size(&caps);
    }

    if let Some(caps) = NAMED_TIMING_RE.captures(line) {
        let identity = caps["name"].trim().to_string();
        return Ok(match timing_block(&caps)? {
            Some(timing) => LineKind::NamedTiming { identity, timing },
            None => LineKind::Unrecognized,
        });
    }

    if BARE_NAME_RE.is_match(line) && registry.is_known(line) {
        return Ok(LineKind::BareName {
            identity: line.to_string(),
        });
    }

    if let Some(caps) = TIMING_ONLY_RE.captures(line) {
        return Ok(match timing_block(&caps)? {
            Some(timing) => LineKind::TimingOnly(timing),
            None => LineKind::Unrecognized,
        });
    }

    Ok(LineKind::Unrecognized)
}

/// Whether `line` has the shape of a timing line, named or not, regardless
/// of whether its units are supported.
pub(crate) fn is_timing_line(line: &str) -> bool {
    let line = line.trim();
    NAMED_TIMING_RE.is_match(line) || TIMING_ONLY_RE.is_match(line)
}

fn number(caps: &Captures<'_>, group: &str) -> Option<f64> {
    caps.name(group)?.as_str().parse::<f64>().ok()
}

fn file_size(caps: &Captures<'_>) -> Result<LineKind> {
    let identity = caps["name"].to_string();
    let size_kb = match caps.name("size") {
        Some(_) => match number(caps, "size") {
            Some(value) => units::normalize_size(value, &caps["unit"])?,
            None => return Ok(LineKind::Unrecognized),
        },
        None => match number(caps, "bytes") {
            Some(bytes) => units::normalize_size(bytes, "bytes")?,
            None => return Ok(LineKind::Unrecognized),
        },
    };
    Ok(LineKind::FileSize { identity, size_kb })
}

/// Parse the three bracketed values; `Ok(None)` on a malformed number.
fn timing_block(caps: &Captures<'_>) -> Result<Option<TimingBlock>> {
    let (Some(min), Some(median), Some(max)) = (
        number(caps, "min"),
        number(caps, "median"),
        number(caps, "max"),
    ) else {
        return Ok(None);
    };

    Ok(Some(TimingBlock {
        min_us: units::normalize(min, &caps["min_unit"])?,
        median_us: units::normalize(median, &caps["median_unit"])?,
        max_us: units::normalize(max, &caps["max_unit"])?,
    }))
}
