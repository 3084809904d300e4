//! Inclusion proof generation.
//!
//! A [`Proof`] carries the leaf digest, the root digest it commits to, and
//! the sibling digests on the way up. It holds no reference to the tree and
//! can be checked by anyone who knows the hash function (see `verify.rs`).

use std::fmt;

use bincode::{Decode, Encode};

use crate::{Digest, HashFunction, MerkleTree, MerkleTreeError, NodePosition, Result};

mod verify;

pub use verify::MAX_PROOF_PATH_LEN;

/// Width of the leaf index field in size estimates.
const INDEX_FIELD_SIZE: usize = 4;
/// Width of the side tag in size estimates.
const SIDE_FIELD_SIZE: usize = 1;

/// Which side the sibling occupied relative to the node being authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Encode, Decode)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Side {
    /// Sibling was at the lower index: `parent = H(sibling ++ current)`.
    Left,
    /// Sibling was at the higher index, or was the node itself:
    /// `parent = H(current ++ sibling)`.
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.pad("left"),
            Side::Right => f.pad("right"),
        }
    }
}

/// One step of a proof path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Encode, Decode)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProofStep {
    /// Sibling digest.
    pub digest: Digest,
    /// Sibling side.
    pub side: Side,
}

/// An inclusion proof for a single leaf.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Encode, Decode)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Proof {
    /// Index of the proved leaf at the time the proof was made.
    pub leaf_index: usize,
    /// Digest of the proved leaf.
    pub leaf_digest: Digest,
    /// Root the path folds up to.
    pub root_digest: Digest,
    /// Sibling digests from the leaf level up to just below the root.
    pub path: Vec<ProofStep>,
}

impl Proof {
    /// Estimated encoded size in bytes, for capacity planning:
    /// `2 * digest_size + 4 + path_len * (digest_size + 1)`.
    pub fn estimated_size<H: HashFunction>(&self, hasher: &H) -> usize {
        let digest_size = hasher.digest_size();
        2 * digest_size + INDEX_FIELD_SIZE + self.path.len() * (digest_size + SIDE_FIELD_SIZE)
    }

    /// Encode to bytes using bincode.
    pub fn encode_to_vec(&self) -> Result<Vec<u8>> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_no_limit();
        bincode::encode_to_vec(self, config)
            .map_err(|e| MerkleTreeError::InvalidProof(format!("encode error: {}", e)))
    }

    /// Decode from bytes using bincode.
    ///
    /// Only the encoding is checked here; whether the proof holds is up to
    /// [`verify`](Self::verify).
    pub fn decode_from_slice(bytes: &[u8]) -> Result<Self> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_limit::<{ 1024 * 1024 }>();
        let (proof, read): (Self, usize) = bincode::decode_from_slice(bytes, config)
            .map_err(|e| MerkleTreeError::InvalidProof(format!("decode error: {}", e)))?;
        if read != bytes.len() {
            return Err(MerkleTreeError::InvalidProof(format!(
                "{} trailing bytes after proof",
                bytes.len() - read
            )));
        }
        Ok(proof)
    }
}

impl fmt::Display for Proof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Merkle Proof for leaf {}:", self.leaf_index)?;
        writeln!(f, "Leaf Hash: {}", self.leaf_digest)?;
        writeln!(f, "Root Hash: {}", self.root_digest)?;
        writeln!(f, "Proof Path:")?;
        for (i, step) in self.path.iter().enumerate() {
            writeln!(f, "  {}. {}: {}", i + 1, step.side, step.digest)?;
        }
        Ok(())
    }
}

impl<H: HashFunction> MerkleTree<H> {
    /// Generate an inclusion proof for the leaf at `leaf_index`.
    ///
    /// The path has exactly `depth - 1` steps. When the node on the path is
    /// the last one of an odd-length level, its own digest is the sibling.
    pub fn prove_by_index(&self, leaf_index: usize) -> Result<Proof> {
        let leaf = self.leaf_at(leaf_index)?;
        let root_digest = self
            .root_digest()
            .cloned()
            .ok_or_else(|| self.out_of_range(leaf_index))?;

        let levels = self.levels();
        let mut path = Vec::with_capacity(levels.len().saturating_sub(1));
        let mut position = NodePosition::leaf(leaf_index);
        for level in &levels[..levels.len() - 1] {
            let sibling = position.sibling(level.len());
            let side = if sibling.index < position.index {
                Side::Left
            } else {
                Side::Right
            };
            path.push(ProofStep {
                digest: level[sibling.index].clone(),
                side,
            });
            position = position.parent();
        }

        Ok(Proof {
            leaf_index,
            leaf_digest: leaf.digest.clone(),
            root_digest,
            path,
        })
    }

    /// Generate an inclusion proof for the first leaf holding `item`.
    pub fn prove_by_item(&self, item: &[u8]) -> Result<Proof> {
        let index = self
            .index_of_item(item)
            .ok_or(MerkleTreeError::ItemNotFound)?;
        self.prove_by_index(index)
    }
}
