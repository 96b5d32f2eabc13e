pub mod cli;
pub mod config;
pub mod error;
pub mod nav;
pub mod script;
pub mod search;
pub mod site;
pub mod tracing;

pub use config::{NavConfig, SearchConfig, SiteConfig};
pub use error::{ConfigError, LoadError, NotFoundError, PathError, SiteError};
pub use nav::{ExpansionState, NavPath, NavTree, Navigator, NodeId};
pub use search::{MatchKind, SearchEngine, SearchHit, SearchResults};
pub use site::Site;
