//! Ranked search results.

use super::scoring::{LoadOrder, MatchKind};
use super::shard::SearchTarget;
use serde::Serialize;
use std::cmp::Ordering;

/// One result row: an entry's name paired with one of its targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub display_name: String,
    pub sort_key: String,
    pub kind: MatchKind,
    #[serde(flatten)]
    pub target: SearchTarget,
    #[serde(skip)]
    pub(crate) order: LoadOrder,
}

impl SearchHit {
    /// Total ranking order: match kind, then sort key, then load order.
    pub(crate) fn rank_cmp(&self, other: &Self) -> Ordering {
        self.kind
            .cmp(&other.kind)
            .then_with(|| self.sort_key.cmp(&other.sort_key))
            .then_with(|| self.order.cmp(&other.order))
    }
}

/// The outcome of one query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    /// The normalized query these results answer.
    pub query: String,
    pub hits: Vec<SearchHit>,
    /// More rows matched than the requested maximum.
    pub truncated: bool,
}

impl SearchResults {
    pub(crate) fn empty(query: String) -> Self {
        Self {
            query,
            hits: Vec::new(),
            truncated: false,
        }
    }

    /// Ranks `hits` and cuts them down to `limit`.
    pub(crate) fn ranked(query: String, mut hits: Vec<SearchHit>, limit: usize) -> Self {
        hits.sort_by(SearchHit::rank_cmp);
        let truncated = hits.len() > limit;
        hits.truncate(limit);
        Self {
            query,
            hits,
            truncated,
        }
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SearchHit> {
        self.hits.iter()
    }
}

impl<'a> IntoIterator for &'a SearchResults {
    type Item = &'a SearchHit;
    type IntoIter = std::slice::Iter<'a, SearchHit>;

    fn into_iter(self) -> Self::IntoIter {
        self.hits.iter()
    }
}
