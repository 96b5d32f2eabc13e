//! Error handling types and utilities.

use std::path::PathBuf;
use thiserror::Error;

/// A specialized Result type for top-level docnav operations.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` in the binary and config loading paths.
pub type Result<T> = anyhow::Result<T>;

/// Error returned when a search or navigation data source cannot be loaded.
///
/// Fatal to the component being loaded, never to its sibling.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A data file or directory could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not a recognizable `var NAME = ...;` script or JSON literal.
    #[error("malformed script in {origin}: {reason}")]
    Script { origin: String, reason: String },
    /// The extracted literal is not valid JSON.
    #[error("malformed data in {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
    /// A search record does not match any accepted shape.
    #[error("invalid record #{position} in {origin}: {reason}")]
    Record {
        origin: String,
        position: usize,
        reason: String,
    },
    /// The search directory holds no shard files.
    #[error("no search shards found in {}", dir.display())]
    NoShards { dir: PathBuf },
    /// The navigation tree could not be decoded.
    #[error("invalid navigation tree in {origin}: {reason}")]
    Tree { origin: String, reason: String },
}

/// A page has no mapping in the navigation index.
///
/// Callers keep their prior expansion state and show no highlight.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no navigation entry for '{key}'")]
pub struct NotFoundError {
    pub key: String,
}

/// A navigation path does not address a node of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("child index {index} at depth {depth} is out of range ({children} children)")]
    OutOfRange {
        depth: usize,
        index: usize,
        children: usize,
    },
}

/// A component of a [`Site`](crate::Site) is not ready.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SiteError {
    #[error("{component} is unavailable: {reason}")]
    Unavailable {
        component: &'static str,
        reason: String,
    },
}

/// Error returned when the site configuration cannot be read.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
