//! Match classification and result ordering.

use serde::Serialize;
use std::fmt;

/// Where a query was found inside a sort key.
///
/// The derived ordering is the ranking: prefix matches come first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// The key starts with the query.
    Prefix,
    /// The query occurs somewhere after the first character.
    Interior,
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Prefix => "prefix",
            Self::Interior => "interior",
        })
    }
}

/// Classify how `query` matches `key`. Both must already be normalized.
///
/// Returns `None` when the key does not contain the query.
pub fn classify(key: &str, query: &str) -> Option<MatchKind> {
    if key.starts_with(query) {
        Some(MatchKind::Prefix)
    } else if key.contains(query) {
        Some(MatchKind::Interior)
    } else {
        None
    }
}

/// Position of a result row in load order: shard, entry within shard, target within entry.
///
/// Breaks ties between rows whose kind and sort key are equal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct LoadOrder {
    pub(crate) shard: usize,
    pub(crate) entry: usize,
    pub(crate) target: usize,
}
