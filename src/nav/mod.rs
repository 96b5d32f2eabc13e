//! Navigation tree resolution.
//!
//! A page URL is looked up in the index to get its tree path, and the path is
//! overlaid onto the UI's expansion state: every ancestor opens and the target
//! is highlighted.

// Module declarations
pub(crate) mod index;
pub(crate) mod navigator;
pub(crate) mod path;
pub(crate) mod state;
pub(crate) mod tree;

// Public re-exports (used via lib.rs)
pub use index::NavIndex;
pub use navigator::{Navigator, Suggestion};
pub use path::NavPath;
pub use state::{ExpansionState, PathOverlay, overlay};
pub use tree::{NavNode, NavTree, NodeId, NodeSpec};
