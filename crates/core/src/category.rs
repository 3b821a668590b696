// Copyright 2025 Benchplot Contributors
// SPDX-License-Identifier: Apache-2.0

//! Benchmark families and category splitting.
//!
//! A family is a `(prefix, label)` pair. Families are checked in registration
//! order and the first matching prefix wins, so more specific prefixes must be
//! registered before shorter ones that overlap them.

use serde::{Deserialize, Serialize};

use crate::record::BenchmarkRecord;

/// Label of the implicit group for identities that match no family.
pub const UNCLASSIFIED: &str = "unclassified";

/// Characters accepted between a family prefix and the rest of the identity.
const SEPARATORS: &[char] = &['_', '/', '-', ' '];

/// A recognized benchmark family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Family {
    /// Literal identity prefix, e.g. `parquet_encoding`.
    pub prefix: String,
    /// Category label, e.g. `encode`.
    pub label: String,
}

impl Family {
    /// Create a new family.
    pub fn new(prefix: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            label: label.into(),
        }
    }

    /// Strip this family's prefix from `identity`.
    ///
    /// Removes the prefix and at most one separator directly after it, also
    /// when the prefix itself ends in one. Returns `None` when `identity` does
    /// not start with the prefix or nothing would remain.
    pub fn strip<'a>(&self, identity: &'a str) -> Option<&'a str> {
        if self.prefix.is_empty() {
            return None;
        }
        let rest = identity.strip_prefix(self.prefix.as_str())?;
        let rest = rest.strip_prefix(SEPARATORS).unwrap_or(rest);
        if rest.is_empty() {
            None
        } else {
            Some(rest)
        }
    }
}

/// Outcome of matching an identity against the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification<'a> {
    /// Matched family, if any.
    pub family: Option<&'a Family>,
    /// Identity with the family prefix removed.
    pub display_name: &'a str,
}

impl Classification<'_> {
    /// Category label, falling back to [`UNCLASSIFIED`].
    pub fn label(&self) -> &str {
        self.family.map_or(UNCLASSIFIED, |f| f.label.as_str())
    }
}

/// Ordered list of families.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FamilyRegistry {
    families: Vec<Family>,
}

impl FamilyRegistry {
    /// Create an empty registry; every identity is unclassified.
    pub fn new() -> Self {
        Self::default()
    }

    /// Families emitted by the parquet encoding benchmarks.
    pub fn parquet_encoding() -> Self {
        Self::new()
            .with(Family::new("parquet_encoding", "encode"))
            .with(Family::new("decode", "decode"))
    }

    /// Append a family with the lowest priority so far.
    pub fn with(mut self, family: Family) -> Self {
        self.push(family);
        self
    }

    /// Append a family with the lowest priority so far.
    pub fn push(&mut self, family: Family) {
        self.families.push(family);
    }

    /// Registered families in priority order.
    pub fn families(&self) -> &[Family] {
        &self.families
    }

    /// Whether no family is registered.
    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    /// Match `identity` against the families in priority order.
    pub fn classify<'a>(&'a self, identity: &'a str) -> Classification<'a> {
        for family in &self.families {
            if let Some(display_name) = family.strip(identity) {
                return Classification {
                    family: Some(family),
                    display_name,
                };
            }
        }
        Classification {
            family: None,
            display_name: identity,
        }
    }

    /// Whether `identity` starts with a registered family prefix.
    pub fn is_known(&self, identity: &str) -> bool {
        self.classify(identity).family.is_some()
    }
}

impl FromIterator<Family> for FamilyRegistry {
    fn from_iter<I: IntoIterator<Item = Family>>(iter: I) -> Self {
        Self {
            families: iter.into_iter().collect(),
        }
    }
}

/// Records of one category, in parse order unless re-sorted by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryGroup {
    /// Category label.
    pub label: String,
    /// Member records.
    pub records: Vec<BenchmarkRecord>,
}

/// Partition `records` by family.
///
/// Groups come back in registry order with the unclassified group last;
/// empty groups are omitted. Each record's `display_name` and `category` are
/// recomputed from its identity so the grouping is consistent with `registry`.
pub fn split(records: &[BenchmarkRecord], registry: &FamilyRegistry) -> Vec<CategoryGroup> {
    let labels = registry
        .families()
        .iter()
        .map(|f| f.label.as_str())
        .chain(std::iter::once(UNCLASSIFIED));

    let mut groups: Vec<CategoryGroup> = Vec::new();
    for label in labels {
        if !groups.iter().any(|g| g.label == label) {
            groups.push(CategoryGroup {
                label: label.to_string(),
                records: Vec::new(),
            });
        }
    }

    for record in records {
        let classification = registry.classify(record.identity());
        let mut record = record.clone();
        record.display_name = classification.display_name.to_string();
        record.category = classification.family.map(|f| f.label.clone());

        let label = classification.label();
        if let Some(group) = groups.iter_mut().find(|g| g.label == label) {
            group.records.push(record);
        }
    }

    groups.retain(|g| !g.records.is_empty());
    groups
}
