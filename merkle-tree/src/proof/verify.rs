//! Proof verification.
//!
//! Pure functions over the proof and a hash function; no tree needed.
//! Proofs may come from untrusted sources, so every check fails closed and
//! returns `false` instead of an error.

use tracing::trace;

use super::{Proof, Side};
use crate::{Digest, HashFunction, MerkleTree};

/// Longest path accepted by verification. A path this long would already
/// authenticate a tree with 2^64 leaves.
pub const MAX_PROOF_PATH_LEN: usize = 64;

impl Proof {
    /// Fold the path from the leaf digest and compare with `root_digest`.
    ///
    /// Returns `false` for malformed proofs: digests whose length differs
    /// from the hasher's digest size, or an overlong path.
    pub fn verify<H: HashFunction>(&self, hasher: &H) -> bool {
        match self.compute_root(hasher) {
            Some(computed) => {
                let matches = computed == self.root_digest;
                if !matches {
                    trace!(leaf_index = self.leaf_index, "proof root mismatch");
                }
                matches
            }
            None => false,
        }
    }

    /// Like [`verify`](Self::verify), but also requires the proof to commit
    /// to `trusted_root`.
    pub fn verify_against_root<H: HashFunction>(&self, hasher: &H, trusted_root: &Digest) -> bool {
        if &self.root_digest != trusted_root {
            trace!(leaf_index = self.leaf_index, "proof is for a different root");
            return false;
        }
        self.verify(hasher)
    }

    /// `true` only if `item` hashes to the leaf digest and the proof
    /// verifies. Stops a valid path from vouching for a different item.
    pub fn verify_item<H: HashFunction>(&self, hasher: &H, item: &[u8]) -> bool {
        self.binds_item(hasher, item) && self.verify(hasher)
    }

    /// [`verify_item`](Self::verify_item) pinned to `trusted_root`.
    pub fn verify_item_against_root<H: HashFunction>(
        &self,
        hasher: &H,
        item: &[u8],
        trusted_root: &Digest,
    ) -> bool {
        self.binds_item(hasher, item) && self.verify_against_root(hasher, trusted_root)
    }

    fn binds_item<H: HashFunction>(&self, hasher: &H, item: &[u8]) -> bool {
        let matches = hasher.digest(item) == self.leaf_digest;
        if !matches {
            trace!(leaf_index = self.leaf_index, "item does not match proof leaf");
        }
        matches
    }

    /// Recompute the root from the leaf digest and path, or `None` if the
    /// proof is malformed.
    fn compute_root<H: HashFunction>(&self, hasher: &H) -> Option<Digest> {
        let digest_size = hasher.digest_size();
        if self.leaf_digest.len() != digest_size || self.root_digest.len() != digest_size {
            trace!(
                leaf_index = self.leaf_index,
                expected = digest_size,
                "proof digest has the wrong size"
            );
            return None;
        }
        if self.path.len() > MAX_PROOF_PATH_LEN {
            trace!(path_len = self.path.len(), "proof path too long");
            return None;
        }

        let mut computed = self.leaf_digest.clone();
        for step in &self.path {
            if step.digest.len() != digest_size {
                trace!(leaf_index = self.leaf_index, "proof step has the wrong size");
                return None;
            }
            computed = match step.side {
                Side::Left => hasher.combine(&step.digest, &computed),
                Side::Right => hasher.combine(&computed, &step.digest),
            };
        }
        Some(computed)
    }
}

impl<H: HashFunction> MerkleTree<H> {
    /// Verify a proof with this tree's hash function.
    ///
    /// Only the proof is consulted; the tree's current root is not.
    pub fn verify(&self, proof: &Proof) -> bool {
        proof.verify(self.hasher())
    }

    /// [`Proof::verify_item`] with this tree's hash function.
    pub fn verify_item_against_proof(&self, item: &[u8], proof: &Proof) -> bool {
        proof.verify_item(self.hasher(), item)
    }

    /// Like [`verify_item_against_proof`](Self::verify_item_against_proof),
    /// and the proof must also commit to this tree's current root.
    pub fn verify_item_in_tree(&self, item: &[u8], proof: &Proof) -> bool {
        match self.root_digest() {
            Some(root) if root == &proof.root_digest => self.verify_item_against_proof(item, proof),
            _ => false,
        }
    }
}
