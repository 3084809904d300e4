//! The Merkle tree: an ordered item list plus the levels derived from it.
//!
//! Levels are stored as an arena of digest vectors, leaves at level 0 and the
//! single root at the last level. They are always the full derivation of the
//! item list: every mutation re-derives all levels and swaps them in at once.

mod summary;

#[cfg(test)]
mod tests;

pub use summary::{LeafSummary, NodeSummary, TreeSummary};
use tracing::debug;

use crate::{
    Blake3Hash, Digest, HashFunction, Leaf, MerkleTreeError, Node, NodePosition, Result,
};

/// A binary Merkle tree over an ordered list of opaque items.
///
/// Within a level of odd length the last node is paired with itself to form
/// its parent, so the root of `[A, B, C]` is
/// `H(H(H(A) ++ H(B)) ++ H(H(C) ++ H(C)))`.
///
/// An empty tree has no levels and no root. That is a normal state, not an
/// error.
#[derive(Debug, Clone)]
pub struct MerkleTree<H = Blake3Hash> {
    hasher: H,
    items: Vec<Vec<u8>>,
    levels: Vec<Vec<Digest>>,
}

impl<H: HashFunction + Default> MerkleTree<H> {
    /// Create an empty tree using the default hasher.
    pub fn new() -> Self {
        Self::with_hasher(H::default())
    }

    /// Build a tree from `items` using the default hasher.
    ///
    /// Fails with `InvalidInput` if `items` is empty or any item is blank.
    pub fn from_items<I, T>(items: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<Vec<u8>>,
    {
        Self::from_items_with_hasher(items, H::default())
    }
}

impl<H: HashFunction + Default> Default for MerkleTree<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: HashFunction> MerkleTree<H> {
    /// Create an empty tree with the given hasher.
    pub fn with_hasher(hasher: H) -> Self {
        MerkleTree {
            hasher,
            items: Vec::new(),
            levels: Vec::new(),
        }
    }

    /// Build a tree from `items` with the given hasher.
    pub fn from_items_with_hasher<I, T>(items: I, hasher: H) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<Vec<u8>>,
    {
        let mut tree = Self::with_hasher(hasher);
        tree.rebuild(items)?;
        Ok(tree)
    }

    /// The hash function in use.
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Append one item and re-derive every level.
    ///
    /// Fails with `InvalidInput` if the item is blank; the tree is left
    /// untouched in that case.
    pub fn add(&mut self, item: impl Into<Vec<u8>>) -> Result<()> {
        let item = item.into();
        validate_item(&item, self.items.len())?;
        self.items.push(item);
        self.levels = build_levels(&self.hasher, &self.items);
        debug!(
            leaf_count = self.leaf_count(),
            depth = self.depth(),
            hash = self.hasher.name(),
            "appended item to merkle tree"
        );
        Ok(())
    }

    /// Replace all items and re-derive every level.
    ///
    /// Fails with `InvalidInput` if `items` is empty or any item is blank;
    /// the previous state is kept in that case.
    pub fn rebuild<I, T>(&mut self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<Vec<u8>>,
    {
        let items: Vec<Vec<u8>> = items.into_iter().map(Into::into).collect();
        if items.is_empty() {
            return Err(MerkleTreeError::InvalidInput(
                "a tree needs at least one item".into(),
            ));
        }
        for (index, item) in items.iter().enumerate() {
            validate_item(item, index)?;
        }
        let levels = build_levels(&self.hasher, &items);
        self.items = items;
        self.levels = levels;
        debug!(
            leaf_count = self.leaf_count(),
            depth = self.depth(),
            hash = self.hasher.name(),
            "rebuilt merkle tree"
        );
        Ok(())
    }

    /// The root digest, or `None` for an empty tree.
    pub fn root_digest(&self) -> Option<&Digest> {
        self.levels.last().and_then(|root_level| root_level.first())
    }

    /// Number of leaves (equal to the number of items).
    pub fn leaf_count(&self) -> usize {
        self.items.len()
    }

    /// Number of levels, leaves and root included; 0 for an empty tree.
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Whether the tree holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The items, in leaf order.
    pub fn items(&self) -> &[Vec<u8>] {
        &self.items
    }

    /// All levels, leaves first.
    pub fn levels(&self) -> &[Vec<Digest>] {
        &self.levels
    }

    /// Digests on one level, or `None` if the level does not exist.
    pub fn level(&self, level: usize) -> Option<&[Digest]> {
        self.levels.get(level).map(Vec::as_slice)
    }

    /// The leaf at `index`.
    pub fn leaf_at(&self, index: usize) -> Result<Leaf<'_>> {
        match (self.items.get(index), self.levels.first()) {
            (Some(item), Some(leaves)) => Ok(Leaf {
                index,
                item,
                digest: &leaves[index],
            }),
            _ => Err(self.out_of_range(index)),
        }
    }

    /// Iterate over every leaf in index order.
    pub fn leaves(&self) -> impl Iterator<Item = Leaf<'_>> + '_ {
        self.items
            .iter()
            .zip(self.levels.first().into_iter().flatten())
            .enumerate()
            .map(|(index, (item, digest))| Leaf {
                index,
                item,
                digest,
            })
    }

    /// Look up any node by position.
    pub fn node_at(&self, position: NodePosition) -> Option<Node<'_>> {
        let digest = self.levels.get(position.level)?.get(position.index)?;
        if position.level == 0 {
            return Some(Node::Leaf(Leaf {
                index: position.index,
                item: &self.items[position.index],
                digest,
            }));
        }
        let (left, right) = position.children(self.levels[position.level - 1].len())?;
        Some(Node::Internal {
            position,
            digest,
            left,
            right,
        })
    }

    /// Positions from the leaf at `leaf_index` up to and including the root.
    pub fn path_to_root(&self, leaf_index: usize) -> Result<Vec<NodePosition>> {
        if leaf_index >= self.leaf_count() {
            return Err(self.out_of_range(leaf_index));
        }
        let mut position = NodePosition::leaf(leaf_index);
        let mut path = Vec::with_capacity(self.depth());
        path.push(position);
        while position.level + 1 < self.depth() {
            position = position.parent();
            path.push(position);
        }
        Ok(path)
    }

    /// Whether any leaf holds exactly `item`.
    pub fn contains_item(&self, item: &[u8]) -> bool {
        self.index_of_item(item).is_some()
    }

    /// Index of the first leaf holding exactly `item`.
    pub fn index_of_item(&self, item: &[u8]) -> Option<usize> {
        self.items.iter().position(|existing| existing.as_slice() == item)
    }

    pub(crate) fn out_of_range(&self, index: usize) -> MerkleTreeError {
        MerkleTreeError::IndexOutOfRange {
            index,
            leaf_count: self.leaf_count(),
        }
    }
}

/// Reject empty items and items made only of whitespace.
fn validate_item(item: &[u8], index: usize) -> Result<()> {
    if item.iter().all(u8::is_ascii_whitespace) {
        return Err(MerkleTreeError::InvalidInput(format!(
            "item at index {} is empty or blank",
            index
        )));
    }
    Ok(())
}

/// Derive every level from the items: leaf digests first, then pairwise
/// parents until a single root remains.
pub(crate) fn build_levels<H: HashFunction>(hasher: &H, items: &[Vec<u8>]) -> Vec<Vec<Digest>> {
    if items.is_empty() {
        return Vec::new();
    }
    let leaves: Vec<Digest> = items.iter().map(|item| hasher.digest(item)).collect();
    let mut levels = vec![leaves];
    while let Some(current) = levels.last().filter(|level| level.len() > 1) {
        let next: Vec<Digest> = current
            .chunks(2)
            .map(|pair| {
                let left = &pair[0];
                let right = pair.get(1).unwrap_or(left);
                hasher.combine(left, right)
            })
            .collect();
        levels.push(next);
    }
    levels
}
