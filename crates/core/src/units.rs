// Copyright 2025 Benchplot Contributors
// SPDX-License-Identifier: Apache-2.0

//! Unit normalization.
//!
//! Time values are canonicalized to microseconds, size values to kibibytes.
//! Unit tokens compare case-insensitively on their ASCII part, and both
//! Unicode spellings of the micro prefix (`µ` U+00B5 and `μ` U+03BC) are
//! accepted.

use crate::error::{ParseError, Result};

/// Micro sign, U+00B5.
const MICRO_SIGN: char = '\u{00B5}';
/// Greek small letter mu, U+03BC.
const GREEK_MU: char = '\u{03BC}';

fn canonical_token(unit: &str) -> String {
    unit.trim()
        .chars()
        .map(|c| if c == GREEK_MU { MICRO_SIGN } else { c.to_ascii_lowercase() })
        .collect()
}

/// Multiplier that converts a value in `unit` into microseconds.
pub fn micros_per_unit(unit: &str) -> Result<f64> {
    let factor = match canonical_token(unit).as_str() {
        "s" => 1_000_000.0,
        "ms" => 1_000.0,
        "us" | "\u{00B5}s" => 1.0,
        "ns" => 0.001,
        "ps" => 0.000_001,
        _ => return Err(ParseError::unsupported_unit(unit)),
    };
    Ok(factor)
}

/// Convert `value` expressed in the time `unit` into microseconds.
///
/// # Errors
///
/// Returns [`ParseError::UnsupportedUnit`] when `unit` is not a known time unit.
pub fn normalize(value: f64, unit: &str) -> Result<f64> {
    Ok(value * micros_per_unit(unit)?)
}

/// Convert `value` expressed in the size `unit` into kibibytes.
///
/// # Errors
///
/// Returns [`ParseError::UnsupportedUnit`] when `unit` is not a known size unit.
pub fn normalize_size(value: f64, unit: &str) -> Result<f64> {
    let factor = match canonical_token(unit).as_str() {
        "b" | "byte" | "bytes" => 1.0 / 1024.0,
        "kb" | "kib" => 1.0,
        "mb" | "mib" => 1024.0,
        "gb" | "gib" => 1024.0 * 1024.0,
        _ => return Err(ParseError::unsupported_unit(unit)),
    };
    Ok(value * factor)
}
