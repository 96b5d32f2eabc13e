//! The search engine: shard table, matching and ranking.

use super::normalize::{leading_char, normalize};
use super::query::{SearchHit, SearchResults};
use super::scoring::{LoadOrder, MatchKind, classify};
use super::shard::{SearchEntry, SearchShard};
use crate::config::SearchConfig;
use crate::error::LoadError;
use crate::script;
use ahash::{AHashMap, AHashSet};
use futures::future::join_all;
use std::borrow::Cow;
use std::path::PathBuf;
use std::time::Instant;

/// Immutable search index built once at startup.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    shards: Vec<SearchShard>,
    /// Leading character to the shards answering for it.
    by_lead: AHashMap<char, Vec<usize>>,
    max_results: usize,
}

impl SearchEngine {
    pub fn new(shards: Vec<SearchShard>) -> Self {
        let mut by_lead: AHashMap<char, Vec<usize>> = AHashMap::new();
        for (index, shard) in shards.iter().enumerate() {
            for &lead in shard.leads() {
                by_lead.entry(lead).or_default().push(index);
            }
        }

        Self {
            shards,
            by_lead,
            max_results: SearchConfig::default().max_results,
        }
    }

    #[must_use]
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Loads every shard file in the configured directory.
    ///
    /// Files are read concurrently. A malformed shard is logged and kept empty unless
    /// `strict` is set.
    pub async fn load(config: &SearchConfig) -> Result<Self, LoadError> {
        let start = Instant::now();
        let files = discover_shards(config).await?;
        if files.is_empty() {
            return Err(LoadError::NoShards {
                dir: config.dir.clone(),
            });
        }

        let sources = join_all(files.iter().map(|path| script::read_source(path))).await;

        let mut shards = Vec::with_capacity(files.len());
        for (path, source) in files.iter().zip(sources) {
            let label = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            let origin = path.display().to_string();

            match source.and_then(|text| SearchShard::parse(label.clone(), &origin, &text)) {
                Ok(shard) => {
                    tracing::debug!("Loaded search shard '{}' ({} entries)", label, shard.len());
                    shards.push(shard);
                }
                Err(e) if config.strict => return Err(e),
                Err(e) => {
                    tracing::warn!("Treating search shard '{}' as empty: {}", label, e);
                    shards.push(SearchShard::empty(label));
                }
            }
        }

        let engine = Self::new(shards).with_max_results(config.max_results);
        tracing::info!(
            "Loaded search index: {} shards, {} entries in {:?}",
            engine.shards.len(),
            engine.entry_count(),
            start.elapsed()
        );
        Ok(engine)
    }

    /// Finds entries whose sort key contains the normalized query.
    ///
    /// The generator repeats records across its `all_*` and per-category shards, so a
    /// row whose sort key, url and anchor were already emitted is skipped and does not
    /// count against `limit`.
    ///
    /// Never fails: a query that normalizes to nothing, or matches nothing, yields
    /// empty results.
    pub fn search(&self, query: &str, limit: usize) -> SearchResults {
        let query = normalize(query);
        let Some(lead) = leading_char(&query) else {
            return SearchResults::empty(query);
        };

        let mut matched: Vec<(MatchKind, LoadOrder, &SearchEntry)> = Vec::new();
        for &shard in self.candidate_shards(lead).iter() {
            for (entry_index, entry) in self.shards[shard].entries().iter().enumerate() {
                if let Some(kind) = classify(&entry.sort_key, &query) {
                    let order = LoadOrder {
                        shard,
                        entry: entry_index,
                        target: 0,
                    };
                    matched.push((kind, order, entry));
                }
            }
        }

        // Rows of one entry are adjacent in rank order, so entries can be ranked
        // first and expanded only as far as the limit needs.
        matched.sort_by(|(kind_a, order_a, a), (kind_b, order_b, b)| {
            kind_a
                .cmp(kind_b)
                .then_with(|| a.sort_key.cmp(&b.sort_key))
                .then_with(|| order_a.cmp(order_b))
        });

        let mut hits = Vec::with_capacity(limit.min(64));
        let mut seen: AHashSet<(&str, &str, Option<&str>)> = AHashSet::new();
        let mut truncated = false;
        'entries: for (kind, order, entry) in matched {
            for (target_index, target) in entry.targets.iter().enumerate() {
                let row = (
                    entry.sort_key.as_str(),
                    target.url.as_str(),
                    target.anchor.as_deref(),
                );
                if !seen.insert(row) {
                    continue;
                }
                if hits.len() == limit {
                    truncated = true;
                    break 'entries;
                }
                hits.push(SearchHit {
                    display_name: entry.display_name.clone(),
                    sort_key: entry.sort_key.clone(),
                    kind,
                    target: target.clone(),
                    order: LoadOrder {
                        target: target_index,
                        ..order
                    },
                });
            }
        }

        tracing::trace!(
            "Query '{}' matched {} rows (truncated: {})",
            query,
            hits.len(),
            truncated
        );

        SearchResults {
            query,
            hits,
            truncated,
        }
    }

    /// Narrows earlier results as the user keeps typing.
    ///
    /// When `previous` came from this engine, was not truncated, and the new query
    /// extends its query, the answer is computed from `previous` alone. Otherwise this
    /// is a plain [`search`](Self::search). Either way the result equals a fresh search.
    pub fn refine(&self, previous: &SearchResults, query: &str, limit: usize) -> SearchResults {
        let normalized = normalize(query);
        let reusable = !previous.truncated
            && !previous.query.is_empty()
            && normalized.starts_with(previous.query.as_str());
        if !reusable {
            return self.search(query, limit);
        }

        let hits = previous
            .iter()
            .filter_map(|hit| {
                classify(&hit.sort_key, &normalized).map(|kind| SearchHit {
                    kind,
                    ..hit.clone()
                })
            })
            .collect();
        SearchResults::ranked(normalized, hits, limit)
    }

    /// Shards to scan for a query starting with `lead`: the ones covering it, or all.
    fn candidate_shards(&self, lead: char) -> Cow<'_, [usize]> {
        match self.by_lead.get(&lead) {
            Some(shards) => Cow::Borrowed(shards.as_slice()),
            None => {
                tracing::trace!("No shard covers '{}', scanning all shards", lead);
                Cow::Owned((0..self.shards.len()).collect())
            }
        }
    }

    /// Default row limit from the configuration.
    pub const fn max_results(&self) -> usize {
        self.max_results
    }

    pub fn shards(&self) -> &[SearchShard] {
        &self.shards
    }

    pub fn entry_count(&self) -> usize {
        self.shards.iter().map(SearchShard::len).sum()
    }
}

/// Lists shard files in the configured directory, sorted by name.
async fn discover_shards(config: &SearchConfig) -> Result<Vec<PathBuf>, LoadError> {
    let io_error = |source| LoadError::Io {
        path: config.dir.clone(),
        source,
    };

    let mut dir = tokio::fs::read_dir(&config.dir).await.map_err(io_error)?;
    let mut files = Vec::new();
    while let Some(entry) = dir.next_entry().await.map_err(io_error)? {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        let is_data = path
            .extension()
            .is_some_and(|ext| ext == "js" || ext == "json");
        if !is_data || config.exclude.iter().any(|excluded| excluded == name) {
            continue;
        }
        if let Some(prefix) = &config.file_prefix
            && !name.starts_with(prefix.as_str())
        {
            continue;
        }
        files.push(path);
    }

    files.sort();
    Ok(files)
}
