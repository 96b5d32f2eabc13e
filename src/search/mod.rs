//! Symbol search over the sharded name index.
//!
//! Shards are loaded once, then queried with a linear scan of the shards covering the
//! query's first character. Matches are ranked prefix-first, then alphabetically.

// Module declarations
pub(crate) mod index;
pub(crate) mod normalize;
pub(crate) mod query;
pub(crate) mod scoring;
pub(crate) mod shard;

// Public re-exports (used via lib.rs)
pub use index::SearchEngine;
pub use normalize::normalize;
pub use query::{SearchHit, SearchResults};
pub use scoring::{MatchKind, classify};
pub use shard::{SearchEntry, SearchShard, SearchTarget};
