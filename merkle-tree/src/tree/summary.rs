//! Read-only snapshot of the whole tree for renderers and transport.
//!
//! Renderers must draw from these levels instead of recomputing hashes.

use crate::{Digest, HashFunction, MerkleTree};

/// Every level of the tree plus headline figures.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TreeSummary {
    /// Root digest, absent for an empty tree.
    pub root_digest: Option<Digest>,
    /// Number of leaves.
    pub leaf_count: usize,
    /// Number of levels.
    pub depth: usize,
    /// Leaves in index order.
    pub leaves: Vec<LeafSummary>,
    /// All levels, leaves first, root last.
    pub levels: Vec<Vec<NodeSummary>>,
}

/// One leaf of a [`TreeSummary`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LeafSummary {
    /// Leaf index.
    pub index: usize,
    /// Raw item.
    #[cfg_attr(feature = "serde", serde(serialize_with = "item_text::serialize"))]
    pub item: Vec<u8>,
    /// Leaf digest.
    pub digest: Digest,
}

/// One node of a level in a [`TreeSummary`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NodeSummary {
    /// Node digest.
    pub digest: Digest,
    /// Whether the node sits on level 0.
    pub is_leaf: bool,
    /// The item, for leaves only.
    #[cfg_attr(feature = "serde", serde(serialize_with = "item_text::serialize_opt"))]
    pub item: Option<Vec<u8>>,
    /// Index within the level.
    pub position: usize,
}

impl<H: HashFunction> MerkleTree<H> {
    /// Snapshot every level of the tree.
    pub fn summary(&self) -> TreeSummary {
        let leaves = self
            .leaves()
            .map(|leaf| LeafSummary {
                index: leaf.index,
                item: leaf.item.to_vec(),
                digest: leaf.digest.clone(),
            })
            .collect();

        let levels = self
            .levels()
            .iter()
            .enumerate()
            .map(|(level, digests)| {
                digests
                    .iter()
                    .enumerate()
                    .map(|(position, digest)| NodeSummary {
                        digest: digest.clone(),
                        is_leaf: level == 0,
                        item: (level == 0).then(|| self.items()[position].clone()),
                        position,
                    })
                    .collect()
            })
            .collect();

        TreeSummary {
            root_digest: self.root_digest().cloned(),
            leaf_count: self.leaf_count(),
            depth: self.depth(),
            leaves,
            levels,
        }
    }
}

/// Items are opaque bytes. UTF-8 items serialize as a string, anything else
/// as `{"hex": "..."}`.
#[cfg(feature = "serde")]
mod item_text {
    use serde::{Serializer, ser::SerializeMap};

    pub(super) fn serialize<S: Serializer>(item: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        match std::str::from_utf8(item) {
            Ok(text) => serializer.serialize_str(text),
            Err(_) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("hex", &hex::encode(item))?;
                map.end()
            }
        }
    }

    pub(super) fn serialize_opt<S: Serializer>(
        item: &Option<Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match item {
            Some(item) => serialize(item, serializer),
            None => serializer.serialize_none(),
        }
    }
}
