//! Site configuration loaded from TOML.

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default file name looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "docnav.toml";

/// Where a site's data files live and how queries behave.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub search: SearchConfig,
    pub navigation: NavConfig,
}

/// Search index location and query limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Directory holding the shard files.
    pub dir: PathBuf,
    /// Only load files whose name starts with this, e.g. `all_`.
    pub file_prefix: Option<String>,
    /// File names in `dir` that are not shards.
    pub exclude: Vec<String>,
    /// Default maximum rows per query.
    pub max_results: usize,
    /// Fail loading when any shard is malformed instead of treating it as empty.
    pub strict: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("html/search"),
            file_prefix: None,
            exclude: vec!["search.js".to_string(), "searchdata.js".to_string()],
            max_results: 50,
            strict: false,
        }
    }
}

/// Navigation tree and index locations.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavConfig {
    /// The tree script (`var NAVTREE = [...]`).
    pub tree: PathBuf,
    /// Index scripts merged in order. Empty means every `navtreeindex*.js` beside `tree`.
    pub indexes: Vec<PathBuf>,
    /// How many close matches to offer for an unknown URL.
    pub suggestions: usize,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            tree: PathBuf::from("html/navtreedata.js"),
            indexes: Vec::new(),
            suggestions: 5,
        }
    }
}

impl SiteConfig {
    /// Parse a config document. Relative paths stay relative.
    pub fn from_toml(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Read a config file, resolving its paths against the file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&text, path)?;
        config.resolve_paths(path.parent().unwrap_or_else(|| Path::new(".")));
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Expand `~` and anchor relative paths at `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        let resolve = |path: &Path| {
            let expanded = expand_tilde(path);
            if expanded.is_absolute() {
                expanded
            } else {
                base.join(expanded)
            }
        };

        self.search.dir = resolve(&self.search.dir);
        self.navigation.tree = resolve(&self.navigation.tree);
        self.navigation.indexes = self.navigation.indexes.iter().map(|p| resolve(p)).collect();
    }
}

/// Expands a leading `~` to the user's home directory.
///
/// - `~/foo` becomes `/home/user/foo`
/// - `~` becomes `/home/user`
/// - Other paths are returned unchanged
pub fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let config = SiteConfig::from_toml("", Path::new("docnav.toml")).unwrap();
        check!(config.search.max_results == 50);
        check!(!config.search.strict);
        check!(config.search.exclude == ["search.js", "searchdata.js"]);
        check!(config.navigation.tree == Path::new("html/navtreedata.js"));
        check!(config.navigation.indexes.is_empty());
    }

    #[test]
    fn test_partial_override() {
        let text = r#"
            [search]
            dir = "out/search"
            file_prefix = "all_"
            max_results = 10

            [navigation]
            indexes = ["out/navtreeindex0.js", "out/navtreeindex1.js"]
        "#;
        let config = SiteConfig::from_toml(text, Path::new("docnav.toml")).unwrap();
        check!(config.search.dir == Path::new("out/search"));
        check!(config.search.file_prefix.as_deref() == Some("all_"));
        check!(config.search.max_results == 10);
        check!(config.search.exclude.len() == 2);
        check!(config.navigation.indexes.len() == 2);
        check!(config.navigation.suggestions == 5);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result = SiteConfig::from_toml("[search]\nmax_result = 3\n", Path::new("bad.toml"));
        check!(let Err(ConfigError::Parse { .. }) = result);
    }

    #[test]
    fn test_resolve_paths_against_base() {
        let mut config = SiteConfig::default();
        config.navigation.indexes = vec![PathBuf::from("/abs/navtreeindex0.js")];
        config.resolve_paths(Path::new("/srv/site"));
        check!(config.search.dir == Path::new("/srv/site/html/search"));
        check!(config.navigation.tree == Path::new("/srv/site/html/navtreedata.js"));
        check!(config.navigation.indexes == [PathBuf::from("/abs/navtreeindex0.js")]);
    }

    #[rstest]
    #[case("/tmp/site", "/tmp/site")]
    #[case("relative/site", "relative/site")]
    #[case("~user/site", "~user/site")]
    fn test_expand_tilde_passthrough(#[case] input: &str, #[case] expected: &str) {
        check!(expand_tilde(Path::new(input)) == Path::new(expected));
    }

    #[test]
    fn test_expand_tilde_home() {
        if let Some(home) = dirs::home_dir() {
            check!(expand_tilde(Path::new("~/docs")) == home.join("docs"));
            check!(expand_tilde(Path::new("~")) == home);
        }
    }
}
