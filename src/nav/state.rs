//! Expand/collapse/highlight state of a navigation tree.

use super::path::NavPath;
use super::tree::{NavTree, NodeId};
use crate::error::PathError;
use std::collections::BTreeSet;

/// What applying a path forces open and highlights.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathOverlay {
    /// Nodes addressed by each non-empty prefix of the path, outermost first.
    pub opened: Vec<NodeId>,
    pub highlighted: NodeId,
}

/// Computes the overlay for `path` without touching any state.
pub fn overlay(tree: &NavTree, path: &NavPath) -> Result<PathOverlay, PathError> {
    let opened = tree.walk(path)?;
    let highlighted = opened.last().copied().unwrap_or_else(|| tree.root());
    Ok(PathOverlay {
        opened,
        highlighted,
    })
}

/// Per-page-view tree state, owned by the UI.
///
/// Every node starts collapsed. Path overlays only ever expand; collapsing is left
/// to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    expanded: BTreeSet<NodeId>,
    highlighted: Option<NodeId>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens every node along `path` and highlights its target.
    ///
    /// Nodes off the path keep their state. On error nothing changes.
    pub fn apply_path(&mut self, tree: &NavTree, path: &NavPath) -> Result<PathOverlay, PathError> {
        let overlay = overlay(tree, path)?;
        self.expanded.extend(overlay.opened.iter().copied());
        self.highlighted = Some(overlay.highlighted);
        Ok(overlay)
    }

    /// Returns `true` if the node was collapsed before.
    pub fn expand(&mut self, id: NodeId) -> bool {
        self.expanded.insert(id)
    }

    /// Returns `true` if the node was expanded before.
    pub fn collapse(&mut self, id: NodeId) -> bool {
        self.expanded.remove(&id)
    }

    /// Flips a node and returns whether it is now expanded.
    pub fn toggle(&mut self, id: NodeId) -> bool {
        if self.collapse(id) {
            false
        } else {
            self.expand(id)
        }
    }

    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.expanded.contains(&id)
    }

    pub const fn expanded(&self) -> &BTreeSet<NodeId> {
        &self.expanded
    }

    pub const fn highlighted(&self) -> Option<NodeId> {
        self.highlighted
    }

    pub fn clear_highlight(&mut self) {
        self.highlighted = None;
    }
}
