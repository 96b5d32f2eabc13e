//! The navigation tree, stored as an arena of nodes.

use super::path::NavPath;
use crate::error::{LoadError, PathError};
use ahash::AHashMap;
use serde_json::Value;

/// Subtrees nested deeper than this are rejected; it also stops self-referencing
/// subtree scripts from recursing forever.
const MAX_DEPTH: usize = 128;

/// Handle to a node of one [`NavTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: Self = Self(0);

    pub const fn index(self) -> usize {
        self.0
    }
}

/// One row of the navigation tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavNode {
    pub label: String,
    pub url: Option<String>,
    pub anchor: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl NavNode {
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Owned description of a subtree, used to build a [`NavTree`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeSpec {
    pub label: String,
    /// `page.html` or `page.html#anchor`.
    pub link: Option<String>,
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    pub fn new(label: impl Into<String>, link: Option<&str>) -> Self {
        Self {
            label: label.into(),
            link: link.map(str::to_string),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<Self>) -> Self {
        self.children = children;
        self
    }
}

/// Rooted, ordered navigation tree. Nodes are exclusively owned by the arena and
/// addressed by [`NodeId`] or [`NavPath`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavTree {
    nodes: Vec<NavNode>,
}

impl NavTree {
    /// Flattens a subtree description into the arena; `root` becomes [`NodeId::ROOT`].
    pub fn new(root: NodeSpec) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        tree.insert(root, None);
        tree
    }

    fn insert(&mut self, spec: NodeSpec, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        let (url, anchor) = match spec.link.as_deref().map(|link| link.split_once('#')) {
            Some(Some((url, anchor))) => (
                Some(url.to_string()).filter(|u| !u.is_empty()),
                Some(anchor.to_string()).filter(|a| !a.is_empty()),
            ),
            Some(None) => (spec.link.clone().filter(|u| !u.is_empty()), None),
            None => (None, None),
        };
        self.nodes.push(NavNode {
            label: spec.label,
            url,
            anchor,
            parent,
            children: Vec::with_capacity(spec.children.len()),
        });

        for child in spec.children {
            let child_id = self.insert(child, Some(id));
            self.nodes[id.0].children.push(child_id);
        }
        id
    }

    /// Decodes the generator's `[label, link, children]` node layout.
    ///
    /// `children` may be an array of nodes, `null`, or the name of a subtree found in
    /// `subtrees`. The top level is a single node, a one-element array holding the
    /// root, or a list of top-level nodes under an unnamed root.
    pub fn decode(
        value: &Value,
        subtrees: &AHashMap<String, Value>,
        origin: &str,
    ) -> Result<Self, LoadError> {
        let tree_error = |reason: String| LoadError::Tree {
            origin: origin.to_string(),
            reason,
        };

        let items = value
            .as_array()
            .ok_or_else(|| tree_error("tree is not an array".to_string()))?;
        let root = match items.as_slice() {
            [Value::String(_), ..] => decode_node(value, subtrees, 0),
            [single] => decode_node(single, subtrees, 0),
            nodes => nodes
                .iter()
                .map(|node| decode_node(node, subtrees, 1))
                .collect::<Result<Vec<_>, _>>()
                .map(|children| NodeSpec::default().with_children(children)),
        }
        .map_err(tree_error)?;

        Ok(Self::new(root))
    }

    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn node(&self, id: NodeId) -> Option<&NavNode> {
        self.nodes.get(id.0)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[], NavNode::children)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(NavNode::parent)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every node addressed by a non-empty prefix of `path`, outermost first.
    ///
    /// The last element is the node `path` addresses; the root is not included.
    pub fn walk(&self, path: &NavPath) -> Result<Vec<NodeId>, PathError> {
        let mut chain = Vec::with_capacity(path.len());
        let mut current = self.root();
        for (depth, &index) in path.as_slice().iter().enumerate() {
            let children = self.children(current);
            current = *children.get(index).ok_or(PathError::OutOfRange {
                depth,
                index,
                children: children.len(),
            })?;
            chain.push(current);
        }
        Ok(chain)
    }

    /// The node `path` addresses.
    pub fn node_at(&self, path: &NavPath) -> Result<NodeId, PathError> {
        Ok(self.walk(path)?.last().copied().unwrap_or(NodeId::ROOT))
    }

    /// The path addressing `id`, rebuilt from parent links.
    pub fn path_of(&self, id: NodeId) -> Option<NavPath> {
        let mut indices = Vec::new();
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            let index = self.children(parent).iter().position(|&c| c == current)?;
            indices.push(index);
            current = parent;
        }
        (current == NodeId::ROOT && self.node(id).is_some()).then(|| {
            indices.reverse();
            NavPath::new(indices)
        })
    }
}

/// Subtree names referenced from string `children` slots, in document order.
pub(crate) fn subtree_refs(value: &Value, refs: &mut Vec<String>) {
    if let Value::Array(items) = value {
        if let (Some(Value::String(_)), Some(Value::String(name))) = (items.first(), items.get(2))
        {
            refs.push(name.clone());
        }
        for item in items {
            subtree_refs(item, refs);
        }
    }
}

fn decode_node(
    value: &Value,
    subtrees: &AHashMap<String, Value>,
    depth: usize,
) -> Result<NodeSpec, String> {
    if depth > MAX_DEPTH {
        return Err(format!("tree is nested deeper than {} levels", MAX_DEPTH));
    }

    let fields = value.as_array().ok_or("node is not an array")?;
    let label = match fields.first() {
        Some(Value::String(label)) => label.clone(),
        _ => return Err("node has no label".to_string()),
    };
    let link = match fields.get(1) {
        None | Some(Value::Null) => None,
        Some(Value::String(link)) => Some(link.clone()),
        Some(other) => return Err(format!("node '{}' has a non-string link {}", label, other)),
    };

    let children = match fields.get(2) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(children)) => decode_children(children, subtrees, depth)?,
        Some(Value::String(name)) => {
            let subtree = subtrees
                .get(name)
                .ok_or_else(|| format!("unresolved subtree '{}' under '{}'", name, label))?;
            let children = subtree
                .as_array()
                .ok_or_else(|| format!("subtree '{}' is not an array", name))?;
            decode_children(children, subtrees, depth)?
        }
        Some(other) => return Err(format!("node '{}' has invalid children {}", label, other)),
    };

    Ok(NodeSpec {
        label,
        link,
        children,
    })
}

fn decode_children(
    children: &[Value],
    subtrees: &AHashMap<String, Value>,
    depth: usize,
) -> Result<Vec<NodeSpec>, String> {
    children
        .iter()
        .map(|child| decode_node(child, subtrees, depth + 1))
        .collect()
}
