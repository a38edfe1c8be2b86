//! Tree nodes and the arena that owns them.
//!
//! Every node lives in a single `Vec` owned by [`SemanticTree`]. Children
//! are stored as ordered [`NodeId`] lists on the parent; the `parent` link is
//! a plain id, so there is exactly one owner for each node and no
//! reference cycles. Dropping the tree drops every node.

use mazewalk_core::{Embedding, TreeError};
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Handle to a node inside one [`SemanticTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in its tree's arena.
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Root,
    Internal,
    Leaf,
}

/// Per-node marker used by a guided search.
///
/// A node only moves forward: `Unvisited`/`Cleared` → `Visiting` →
/// `Done` | `Rejected`. Closed nodes are never offered to the evaluator
/// again within the same search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalState {
    /// Freshly constructed, never searched.
    #[default]
    Unvisited,
    /// Reset sentinel written by [`SemanticTree::reset`] before every search.
    Cleared,
    Visiting,
    Done,
    Rejected,
}

impl TraversalState {
    /// Whether the node may still be offered to an evaluator.
    pub fn is_open(self) -> bool {
        matches!(
            self,
            TraversalState::Unvisited | TraversalState::Cleared | TraversalState::Visiting
        )
    }
}

/// A single tree node.
///
/// Structural fields are fixed once the builder finishes; only the
/// traversal state changes afterwards, and only during a search.
#[derive(Debug, Clone)]
pub struct Node {
    kind: NodeKind,
    summary: String,
    embedding: Embedding,
    raw_content: String,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    sibling_index: Option<usize>,
    state: TraversalState,
}

impl Node {
    pub(crate) fn root() -> Self {
        Self::new(NodeKind::Root, String::new(), Vec::new(), String::new())
    }

    pub(crate) fn leaf(summary: String, embedding: Embedding, raw_content: String) -> Self {
        Self::new(NodeKind::Leaf, summary, embedding, raw_content)
    }

    pub(crate) fn internal(summary: String, embedding: Embedding) -> Self {
        Self::new(NodeKind::Internal, summary, embedding, String::new())
    }

    fn new(kind: NodeKind, summary: String, embedding: Embedding, raw_content: String) -> Self {
        Self {
            kind,
            summary,
            embedding,
            raw_content,
            children: Vec::new(),
            parent: None,
            sibling_index: None,
            state: TraversalState::default(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is_leaf(&self) -> bool {
        self.kind == NodeKind::Leaf
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Embedding of [`Node::summary`], computed once at construction.
    pub fn embedding(&self) -> &[f32] {
        &self.embedding
    }

    /// Original fragment text. Empty for root and internal nodes.
    pub fn raw_content(&self) -> &str {
        &self.raw_content
    }

    /// Raw content when present, otherwise the summary.
    pub fn content_or_summary(&self) -> &str {
        if self.raw_content.is_empty() {
            &self.summary
        } else {
            &self.raw_content
        }
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Position within the parent's children; `None` for the root.
    pub fn sibling_index(&self) -> Option<usize> {
        self.sibling_index
    }

    pub fn state(&self) -> TraversalState {
        self.state
    }
}

/// A hierarchical semantic tree with exactly one root.
#[derive(Debug, Clone)]
pub struct SemanticTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl SemanticTree {
    /// A tree holding only a childless root.
    pub(crate) fn with_root() -> Self {
        Self {
            nodes: vec![Node::root()],
            root: NodeId(0),
        }
    }

    pub(crate) fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Give `parent` ownership of `children`, in order.
    ///
    /// Each child's parent link and sibling index are rewritten. A second
    /// call replaces the previous child set; replaced children are detached.
    /// A child that belonged to another parent is removed from it first.
    pub(crate) fn attach_children(
        &mut self,
        parent: NodeId,
        children: Vec<NodeId>,
    ) -> Result<(), TreeError> {
        self.check(parent)?;
        for &child in &children {
            self.check(child)?;
        }

        for old in std::mem::take(&mut self.nodes[parent.0].children) {
            let node = &mut self.nodes[old.0];
            node.parent = None;
            node.sibling_index = None;
        }

        for (position, &child) in children.iter().enumerate() {
            if let Some(previous) = self.nodes[child.0].parent
                && previous != parent
            {
                self.detach(previous, child);
            }
            let node = &mut self.nodes[child.0];
            node.parent = Some(parent);
            node.sibling_index = Some(position);
        }

        self.nodes[parent.0].children = children;
        Ok(())
    }

    fn detach(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.retain(|&c| c != child);
        let remaining = self.nodes[parent.0].children.clone();
        for (position, sibling) in remaining.into_iter().enumerate() {
            self.nodes[sibling.0].sibling_index = Some(position);
        }
    }

    fn check(&self, id: NodeId) -> Result<(), TreeError> {
        if id.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(TreeError::UnknownNode(id.0))
        }
    }

    pub(crate) fn set_state(&mut self, id: NodeId, state: TraversalState) {
        self.nodes[id.0].state = state;
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Total number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Leaf ids in left-to-right order.
    pub fn leaves(&self) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let node = &self[id];
            if node.is_leaf() {
                leaves.push(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        leaves
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves().len()
    }

    /// Node count per level, starting with the root's level.
    pub fn layer_widths(&self) -> Vec<usize> {
        let mut widths = Vec::new();
        let mut level = vec![self.root];
        while !level.is_empty() {
            widths.push(level.len());
            level = level
                .iter()
                .flat_map(|&id| self[id].children.iter().copied())
                .collect();
        }
        widths
    }

    /// Number of edges on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        self.layer_widths().len() - 1
    }

    /// Put every node reachable from the root back to the reset sentinel.
    ///
    /// Must run before each search; [`SemanticTree::search`] calls it
    /// unconditionally.
    pub fn reset(&mut self) {
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let node = &mut self.nodes[id.0];
            node.state = TraversalState::Cleared;
            stack.extend(node.children.iter().copied());
        }
    }
}

impl Index<NodeId> for SemanticTree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(text: &str) -> Node {
        Node::leaf(text.into(), vec![1.0, 0.0], text.into())
    }

    #[test]
    fn root_only_tree() {
        let tree = SemanticTree::with_root();
        let root = &tree[tree.root()];
        assert_eq!(root.kind(), NodeKind::Root);
        assert_eq!(root.parent(), None);
        assert_eq!(root.sibling_index(), None);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.leaf_count(), 0);
    }

    #[test]
    fn attach_sets_parent_and_sibling_index() {
        let mut tree = SemanticTree::with_root();
        let a = tree.push(leaf("a"));
        let b = tree.push(leaf("b"));
        let root = tree.root();

        tree.attach_children(root, vec![a, b]).unwrap();

        assert_eq!(tree[root].children(), &[a, b]);
        assert_eq!(tree[a].parent(), Some(root));
        assert_eq!(tree[a].sibling_index(), Some(0));
        assert_eq!(tree[b].sibling_index(), Some(1));
    }

    #[test]
    fn reattach_replaces_previous_children() {
        let mut tree = SemanticTree::with_root();
        let a = tree.push(leaf("a"));
        let b = tree.push(leaf("b"));
        let c = tree.push(leaf("c"));
        let root = tree.root();

        tree.attach_children(root, vec![a, b]).unwrap();
        tree.attach_children(root, vec![c, a]).unwrap();

        assert_eq!(tree[root].children(), &[c, a]);
        assert_eq!(tree[b].parent(), None);
        assert_eq!(tree[b].sibling_index(), None);
        assert_eq!(tree[c].sibling_index(), Some(0));
        assert_eq!(tree[a].sibling_index(), Some(1));
    }

    #[test]
    fn attach_moves_child_from_previous_parent() {
        let mut tree = SemanticTree::with_root();
        let a = tree.push(leaf("a"));
        let b = tree.push(leaf("b"));
        let left = tree.push(Node::internal("left".into(), vec![]));
        let right = tree.push(Node::internal("right".into(), vec![]));

        tree.attach_children(left, vec![a, b]).unwrap();
        tree.attach_children(right, vec![a]).unwrap();

        assert_eq!(tree[left].children(), &[b]);
        assert_eq!(tree[b].sibling_index(), Some(0));
        assert_eq!(tree[a].parent(), Some(right));
    }

    #[test]
    fn attach_rejects_unknown_ids() {
        let mut tree = SemanticTree::with_root();
        let root = tree.root();
        let err = tree.attach_children(root, vec![NodeId(42)]).unwrap_err();
        assert!(matches!(err, TreeError::UnknownNode(42)));
        assert!(tree[root].children().is_empty());
    }

    #[test]
    fn reset_clears_every_reachable_node() {
        let mut tree = SemanticTree::with_root();
        let a = tree.push(leaf("a"));
        let b = tree.push(leaf("b"));
        let mid = tree.push(Node::internal("mid".into(), vec![]));
        let root = tree.root();
        tree.attach_children(mid, vec![a, b]).unwrap();
        tree.attach_children(root, vec![mid]).unwrap();

        tree.set_state(a, TraversalState::Done);
        tree.set_state(mid, TraversalState::Rejected);
        tree.set_state(root, TraversalState::Visiting);
        tree.reset();

        for id in [root, mid, a, b] {
            assert_eq!(tree[id].state(), TraversalState::Cleared);
        }
    }

    #[test]
    fn traversal_state_openness() {
        assert!(TraversalState::Unvisited.is_open());
        assert!(TraversalState::Cleared.is_open());
        assert!(TraversalState::Visiting.is_open());
        assert!(!TraversalState::Done.is_open());
        assert!(!TraversalState::Rejected.is_open());
    }

    #[test]
    fn leaves_are_left_to_right_and_layers_counted() {
        let mut tree = SemanticTree::with_root();
        let a = tree.push(leaf("a"));
        let b = tree.push(leaf("b"));
        let c = tree.push(leaf("c"));
        let left = tree.push(Node::internal("left".into(), vec![]));
        let right = tree.push(Node::internal("right".into(), vec![]));
        let root = tree.root();
        tree.attach_children(left, vec![b, a]).unwrap();
        tree.attach_children(right, vec![c]).unwrap();
        tree.attach_children(root, vec![left, right]).unwrap();

        assert_eq!(tree.leaves(), vec![b, a, c]);
        assert_eq!(tree.layer_widths(), vec![1, 2, 3]);
        assert_eq!(tree.depth(), 2);
    }

    #[test]
    fn content_falls_back_to_summary() {
        let node = Node::internal("the gist".into(), vec![]);
        assert_eq!(node.content_or_summary(), "the gist");
        let node = leaf("raw");
        assert_eq!(node.content_or_summary(), "raw");
    }
}
