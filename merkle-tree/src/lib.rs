//! Binary Merkle tree with inclusion proofs and pluggable hashing.
//!
//! Leaves are `H(item)`; parents are `H(left ++ right)` over the raw digest
//! bytes. A level of odd length pairs its last node with itself. The tree is
//! fully re-derived from its item list on every mutation.
//!
//! # Core types
//!
//! - [`MerkleTree`]: items plus derived levels; build, add, rebuild, query.
//! - [`Proof`]: self-contained inclusion proof; verifiable without the tree.
//! - [`HashFunction`]: the hashing capability, with [`Blake3Hash`],
//!   [`Sha256Hash`], [`RollingHash`] and the runtime-selectable
//!   [`HashAlgorithm`].
//! - [`TreeSummary`]: every level of the tree, for renderers and transport.
//!
//! # Example
//!
//! ```
//! use merkle_tree::{MerkleTree, Sha256Hash};
//!
//! let tree = MerkleTree::from_items_with_hasher(["T1", "T2", "T3", "T4"], Sha256Hash)?;
//! assert_eq!(tree.depth(), 3);
//!
//! let proof = tree.prove_by_index(1)?;
//! assert_eq!(proof.path.len(), 2);
//! assert!(proof.verify(&Sha256Hash));
//! assert!(tree.verify_item_against_proof(b"T2", &proof));
//! # Ok::<(), merkle_tree::MerkleTreeError>(())
//! ```

#![warn(missing_docs)]

mod error;
mod hash;
mod node;
mod proof;
mod tree;
pub mod visualize;

#[cfg(test)]
mod tests;

pub use error::{MerkleTreeError, Result};
pub use hash::{Blake3Hash, Digest, HashAlgorithm, HashFunction, RollingHash, Sha256Hash};
pub use node::{Leaf, Node, NodePosition};
pub use proof::{MAX_PROOF_PATH_LEN, Proof, ProofStep, Side};
pub use tree::{LeafSummary, MerkleTree, NodeSummary, TreeSummary};
pub use visualize::Visualize;
