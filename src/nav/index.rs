//! The URL to tree-coordinate table.

use super::path::NavPath;
use super::tree::NavTree;
use crate::error::LoadError;
use crate::script;
use ahash::AHashMap;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Maps `page.html` and `page.html#anchor` keys to tree paths.
///
/// Keys seen more than once resolve to the last path seen and are flagged ambiguous.
#[derive(Debug, Clone, Default)]
pub struct NavIndex {
    entries: AHashMap<String, NavPath>,
    /// Earlier distinct paths of ambiguous keys, oldest first.
    shadowed: AHashMap<String, Vec<NavPath>>,
}

impl NavIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `path` for `key`, replacing any earlier path.
    pub fn insert(&mut self, key: impl Into<String>, path: NavPath) {
        let key = key.into();
        if let Some(previous) = self.entries.get(&key)
            && *previous != path
        {
            tracing::debug!(
                "Navigation key '{}' maps to both {} and {}; keeping the latter",
                key,
                previous,
                path
            );
            let earlier = self.shadowed.entry(key.clone()).or_default();
            earlier.retain(|p| *p != path);
            earlier.push(previous.clone());
        }
        self.entries.insert(key, path);
    }

    /// Merges the entries of an index script (`var NAVTREEINDEXn = {...}` or JSON).
    ///
    /// Returns the number of keys read, duplicates included.
    pub fn extend_from_script(&mut self, text: &str, origin: &str) -> Result<usize, LoadError> {
        let RawIndex(raw) = script::parse(text, origin, None)?;
        let count = raw.len();
        for (key, paths) in raw {
            match paths {
                RawPaths::Single(path) => self.insert(key, path),
                RawPaths::Many(paths) => {
                    for path in paths {
                        self.insert(key.clone(), path);
                    }
                }
            }
        }
        Ok(count)
    }

    pub fn get(&self, key: &str) -> Option<&NavPath> {
        self.entries.get(key)
    }

    /// Whether `key` appeared with more than one distinct path.
    ///
    /// Stays `true` after [`retain_valid`](Self::retain_valid) settles the key on an
    /// earlier path.
    pub fn is_ambiguous(&self, key: &str) -> bool {
        self.shadowed.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops entries whose path does not address a node of `tree`.
    ///
    /// An ambiguous key whose winning path is invalid falls back to the most recent
    /// earlier path that is valid. Returns how many keys were dropped.
    pub fn retain_valid(&mut self, tree: &NavTree) -> usize {
        let before = self.entries.len();
        let shadowed = &self.shadowed;
        self.entries.retain(|key, path| {
            let Err(e) = tree.walk(path) else {
                return true;
            };
            let fallback = shadowed
                .get(key)
                .and_then(|earlier| earlier.iter().rev().find(|p| tree.walk(p).is_ok()));
            match fallback {
                Some(valid) => {
                    tracing::warn!(
                        "Navigation key '{}' path {} is outside the tree ({}); using {}",
                        key,
                        path,
                        e,
                        valid
                    );
                    *path = valid.clone();
                    true
                }
                None => {
                    tracing::warn!("Dropping navigation key '{}' ({}): {}", key, path, e);
                    false
                }
            }
        });
        before - self.entries.len()
    }
}

/// Index object with every key occurrence kept, in document order.
struct RawIndex(Vec<(String, RawPaths)>);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPaths {
    Single(NavPath),
    /// The generator emitted the key more than once.
    Many(Vec<NavPath>),
}

impl<'de> Deserialize<'de> for RawIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RawIndexVisitor;

        impl<'de> Visitor<'de> for RawIndexVisitor {
            type Value = RawIndex;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping page keys to tree paths")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RawIndex, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, RawPaths>()? {
                    entries.push(entry);
                }
                Ok(RawIndex(entries))
            }
        }

        deserializer.deserialize_map(RawIndexVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::tree::NodeSpec;
    use assert2::check;

    const NAVTREEINDEX0: &str = r#"var NAVTREEINDEX0 =
{
"../defender/index.html":[8],
"building.html":[2],
"building.html#building_configuration":[2,0],
"building.html#building_demo":[2,1],
"building.html#building_demo_gui":[2,1,1],
"global_config.html":[1],
"index.html":[0],
"index.html":[],
"pages.html":[[3],[4]]
};
"#;

    #[test]
    fn test_reads_generator_index() {
        let mut index = NavIndex::new();
        let count = index
            .extend_from_script(NAVTREEINDEX0, "navtreeindex0.js")
            .unwrap();
        check!(count == 9);
        check!(index.len() == 8);
        check!(index.get("building.html#building_demo") == Some(&NavPath::from([2, 1])));
        check!(index.get("../defender/index.html") == Some(&NavPath::from([8])));
        check!(index.get("nope.html") == None);
    }

    #[test]
    fn test_duplicate_keys_last_wins() {
        let mut index = NavIndex::new();
        index
            .extend_from_script(NAVTREEINDEX0, "navtreeindex0.js")
            .unwrap();

        check!(index.get("index.html") == Some(&NavPath::default()));
        check!(index.is_ambiguous("index.html"));
        check!(index.get("pages.html") == Some(&NavPath::from([4])));
        check!(index.is_ambiguous("pages.html"));
        check!(!index.is_ambiguous("building.html"));
    }

    #[test]
    fn test_later_files_override_earlier() {
        let mut index = NavIndex::new();
        index.extend_from_script(r#"{"a.html":[1]}"#, "first.json").unwrap();
        index.extend_from_script(r#"{"a.html":[1]}"#, "again.json").unwrap();
        check!(!index.is_ambiguous("a.html"));

        index.extend_from_script(r#"{"a.html":[2]}"#, "second.json").unwrap();
        check!(index.get("a.html") == Some(&NavPath::from([2])));
        check!(index.is_ambiguous("a.html"));
    }

    #[test]
    fn test_rejects_negative_indices() {
        let mut index = NavIndex::new();
        let result = index.extend_from_script(r#"{"a.html":[-1]}"#, "bad.json");
        check!(let Err(LoadError::Json { .. }) = result);
    }

    #[test]
    fn test_retain_valid_drops_dangling_paths() {
        let tree = NavTree::new(NodeSpec::new("Root", Some("index.html")).with_children(vec![
            NodeSpec::new("A", Some("a.html")),
            NodeSpec::new("B", Some("b.html")),
        ]));

        let mut index = NavIndex::new();
        index.insert("a.html", NavPath::from([0]));
        index.insert("b.html", NavPath::from([1]));
        index.insert("c.html", NavPath::from([2]));
        index.insert("a.html#deep", NavPath::from([0, 0]));

        check!(index.retain_valid(&tree) == 2);
        check!(index.len() == 2);
        check!(index.get("c.html") == None);
    }

    #[test]
    fn test_retain_valid_falls_back_to_earlier_duplicate() {
        let tree = NavTree::new(NodeSpec::new("Root", Some("index.html")).with_children(vec![
            NodeSpec::new("A", Some("a.html")),
            NodeSpec::new("B", Some("b.html")),
        ]));

        let mut index = NavIndex::new();
        index
            .extend_from_script(r#"{"a.html":[0],"a.html":[1],"a.html":[5],"b.html":[7]}"#, "t")
            .unwrap();
        check!(index.get("a.html") == Some(&NavPath::from([5])));

        check!(index.retain_valid(&tree) == 1);
        check!(index.get("a.html") == Some(&NavPath::from([1])));
        check!(index.is_ambiguous("a.html"));
        check!(index.get("b.html") == None);
    }
}
