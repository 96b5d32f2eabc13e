//! URL resolution against the navigation tree.

use super::index::NavIndex;
use super::path::NavPath;
use super::state::ExpansionState;
use super::tree::{NavTree, NodeId, subtree_refs};
use crate::config::NavConfig;
use crate::error::{LoadError, NotFoundError};
use crate::script;
use ahash::{AHashMap, AHashSet};
use futures::future::join_all;
use rapidfuzz::distance::jaro_winkler;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// File name prefix of the generator's index scripts.
const INDEX_FILE_PREFIX: &str = "navtreeindex";

/// A known page close to one that could not be resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub key: String,
    /// Jaro-Winkler similarity, 0.0 to 1.0.
    pub score: f64,
}

/// The navigation tree together with its URL index.
///
/// Every path the index holds addresses a node of the tree.
#[derive(Debug, Clone)]
pub struct Navigator {
    tree: NavTree,
    index: NavIndex,
}

impl Navigator {
    /// Pairs a tree with its index, dropping index entries the tree cannot satisfy.
    pub fn new(tree: NavTree, mut index: NavIndex) -> Self {
        let dropped = index.retain_valid(&tree);
        if dropped > 0 {
            tracing::warn!("Dropped {} navigation keys with paths outside the tree", dropped);
        }
        Self { tree, index }
    }

    /// Loads the tree script, its subtree scripts, and every index script.
    pub async fn load(config: &NavConfig) -> Result<Self, LoadError> {
        let start = Instant::now();
        let index_files = if config.indexes.is_empty() {
            discover_index_files(&config.tree).await?
        } else {
            config.indexes.clone()
        };

        let (tree, sources) = tokio::join!(
            load_tree(&config.tree),
            join_all(index_files.iter().map(|path| script::read_source(path)))
        );
        let tree = tree?;

        let mut index = NavIndex::new();
        for (path, source) in index_files.iter().zip(sources) {
            let origin = path.display().to_string();
            let count = index.extend_from_script(&source?, &origin)?;
            tracing::debug!("Read {} navigation keys from {}", count, origin);
        }

        let navigator = Self::new(tree, index);
        tracing::info!(
            "Loaded navigation: {} nodes, {} keys from {} index files in {:?}",
            navigator.tree.len(),
            navigator.index.len(),
            index_files.len(),
            start.elapsed()
        );
        Ok(navigator)
    }

    pub const fn tree(&self) -> &NavTree {
        &self.tree
    }

    pub const fn index(&self) -> &NavIndex {
        &self.index
    }

    /// Resolves a page, optionally at an anchor, to its tree path.
    ///
    /// A fragment inside `url` is used when `anchor` is not given. An anchored key
    /// that is missing falls back to the bare page.
    pub fn resolve_path(&self, url: &str, anchor: Option<&str>) -> Result<&NavPath, NotFoundError> {
        let (page, fragment) = match url.split_once('#') {
            Some((page, fragment)) => (page, Some(fragment)),
            None => (url, None),
        };
        let anchor = anchor.or(fragment).filter(|anchor| !anchor.is_empty());

        if let Some(anchor) = anchor {
            let key = format!("{}#{}", page, anchor);
            if let Some(path) = self.index.get(&key) {
                return Ok(path);
            }
            tracing::trace!("No entry for '{}', falling back to '{}'", key, page);
        }

        self.index.get(page).ok_or_else(|| NotFoundError {
            key: match anchor {
                Some(anchor) => format!("{}#{}", page, anchor),
                None => page.to_string(),
            },
        })
    }

    /// Resolves a page and overlays its path onto `state`.
    ///
    /// When the page is unknown, `state` keeps its expansion and loses its highlight.
    pub fn navigate(
        &self,
        state: &mut ExpansionState,
        url: &str,
        anchor: Option<&str>,
    ) -> Result<NodeId, NotFoundError> {
        let applied = self
            .resolve_path(url, anchor)
            .and_then(|path| {
                state.apply_path(&self.tree, path).map_err(|e| {
                    tracing::debug!("Path {} for '{}' does not fit the tree: {}", path, url, e);
                    NotFoundError {
                        key: url.to_string(),
                    }
                })
            });

        match applied {
            Ok(overlay) => Ok(overlay.highlighted),
            Err(e) => {
                state.clear_highlight();
                Err(e)
            }
        }
    }

    /// Pages whose URL is closest to `url`, best first.
    pub fn suggest(&self, url: &str, limit: usize) -> Vec<Suggestion> {
        let page = url.split_once('#').map_or(url, |(page, _)| page);
        let pages: AHashSet<&str> = self
            .index
            .keys()
            .map(|key| key.split_once('#').map_or(key, |(page, _)| page))
            .collect();

        let mut suggestions: Vec<_> = pages
            .into_iter()
            .map(|key| Suggestion {
                key: key.to_string(),
                score: jaro_winkler::similarity(page.chars(), key.chars()),
            })
            .collect();
        suggestions.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.key.cmp(&b.key)));
        suggestions.truncate(limit);
        suggestions
    }
}

/// Reads the tree script and, level by level, every subtree script it names.
async fn load_tree(path: &Path) -> Result<NavTree, LoadError> {
    let origin = path.display().to_string();
    let root: Value = script::parse(&script::read_source(path).await?, &origin, None)?;
    let dir = path.parent().unwrap_or_else(|| Path::new("."));

    let mut subtrees: AHashMap<String, Value> = AHashMap::new();
    let mut pending = Vec::new();
    subtree_refs(&root, &mut pending);

    while !pending.is_empty() {
        pending.retain(|name| !subtrees.contains_key(name));
        pending.sort();
        pending.dedup();

        let loaded = join_all(pending.iter().map(|name| async move {
            let file = dir.join(format!("{}.js", name));
            let text = script::read_source(&file).await?;
            script::parse::<Value>(&text, &file.display().to_string(), None)
        }))
        .await;

        let mut next = Vec::new();
        for (name, value) in pending.drain(..).zip(loaded) {
            let value = value?;
            subtree_refs(&value, &mut next);
            subtrees.insert(name, value);
        }
        pending = next;
    }

    if !subtrees.is_empty() {
        tracing::debug!("Resolved {} subtree scripts for {}", subtrees.len(), origin);
    }
    NavTree::decode(&root, &subtrees, &origin)
}

/// Finds `navtreeindex*.js` beside the tree script, in numeric order.
async fn discover_index_files(tree: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let dir = tree.parent().unwrap_or_else(|| Path::new("."));
    let io_error = |source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(dir).await.map_err(io_error)?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(io_error)? {
        let path = entry.path();
        let is_index = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(INDEX_FILE_PREFIX) && name.ends_with(".js"));
        if is_index {
            files.push(path);
        }
    }

    // navtreeindex2 before navtreeindex10
    files.sort_by_key(|path| {
        let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        (name.len(), name)
    });
    Ok(files)
}
