// Copyright 2025 Benchplot Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types for the parsing engine.

use thiserror::Error;

/// Errors produced while normalizing units or aggregating a parse pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A unit token that is neither a supported time nor size unit.
    ///
    /// Raised per line; the aggregator discards that line and keeps going.
    #[error("Unsupported unit encountered: {0}")]
    UnsupportedUnit(String),

    /// The whole pass produced no timing records.
    #[error("Failed to parse benchmark results from output")]
    NoResultsParsed,
}

impl ParseError {
    /// Create an [`ParseError::UnsupportedUnit`] carrying the offending token.
    pub fn unsupported_unit(unit: impl Into<String>) -> Self {
        ParseError::UnsupportedUnit(unit.into())
    }

    /// Whether the error only affects a single line of input.
    pub fn is_line_local(&self) -> bool {
        matches!(self, ParseError::UnsupportedUnit(_))
    }
}

/// Result type for parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;
