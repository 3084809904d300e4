//! Node addressing within the level arena.
//!
//! Nodes are not linked to each other. A node is identified by its
//! `(level, index)` position, and parents, children and siblings are derived
//! arithmetically: the parent of `i` is `i / 2`, the children of `i` are
//! `2i` and `2i + 1` (the latter falling back to `2i` when the level below
//! has odd length).

use crate::Digest;

/// Position of a node in the tree: level 0 holds the leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodePosition {
    /// Level, counted from the leaves upward.
    pub level: usize,
    /// Index within the level.
    pub index: usize,
}

impl NodePosition {
    /// Create a position.
    pub fn new(level: usize, index: usize) -> Self {
        NodePosition { level, index }
    }

    /// Position of the leaf with the given index.
    pub fn leaf(index: usize) -> Self {
        NodePosition { level: 0, index }
    }

    /// The parent one level up.
    pub fn parent(&self) -> NodePosition {
        NodePosition {
            level: self.level + 1,
            index: self.index / 2,
        }
    }

    /// Index of the sibling within the same level, ignoring level bounds.
    pub fn sibling_index(&self) -> usize {
        self.index ^ 1
    }

    /// The node paired with this one when hashing the parent.
    ///
    /// For the last node of an odd-length level this is the node itself.
    pub fn sibling(&self, level_len: usize) -> NodePosition {
        let sibling = self.sibling_index();
        NodePosition {
            level: self.level,
            index: if sibling < level_len { sibling } else { self.index },
        }
    }

    /// Left and right children, given the length of the level below.
    ///
    /// Returns `None` for leaves or when the computed left child does not
    /// exist in the level below.
    pub fn children(&self, child_level_len: usize) -> Option<(NodePosition, NodePosition)> {
        if self.level == 0 {
            return None;
        }
        let left = 2 * self.index;
        if left >= child_level_len {
            return None;
        }
        let right = if left + 1 < child_level_len { left + 1 } else { left };
        Some((
            NodePosition::new(self.level - 1, left),
            NodePosition::new(self.level - 1, right),
        ))
    }
}

/// Borrowed view of one leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leaf<'a> {
    /// 0-based position in the item list.
    pub index: usize,
    /// The raw item.
    pub item: &'a [u8],
    /// `hash(item)`.
    pub digest: &'a Digest,
}

/// Borrowed view of any node in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node<'a> {
    /// A node on level 0.
    Leaf(Leaf<'a>),
    /// A node combining two children.
    ///
    /// `left == right` when the node was formed by self-duplication.
    Internal {
        /// Where this node lives.
        position: NodePosition,
        /// `hash(left.digest ++ right.digest)`.
        digest: &'a Digest,
        /// Left child position.
        left: NodePosition,
        /// Right child position.
        right: NodePosition,
    },
}

impl<'a> Node<'a> {
    /// The node's digest.
    pub fn digest(&self) -> &'a Digest {
        match *self {
            Node::Leaf(leaf) => leaf.digest,
            Node::Internal { digest, .. } => digest,
        }
    }

    /// The node's position.
    pub fn position(&self) -> NodePosition {
        match *self {
            Node::Leaf(leaf) => NodePosition::leaf(leaf.index),
            Node::Internal { position, .. } => position,
        }
    }

    /// Whether this is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }
}
