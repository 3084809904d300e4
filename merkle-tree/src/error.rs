use thiserror::Error;

/// Errors from Merkle tree operations.
///
/// Verification never produces one of these: a bad proof simply verifies as
/// `false`.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum MerkleTreeError {
    /// Empty item list, or an empty/blank item.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A leaf index at or beyond the current leaf count.
    #[error("index {index} is out of range (leaf count {leaf_count})")]
    IndexOutOfRange {
        /// The requested leaf index.
        index: usize,
        /// Leaf count at the time of the request.
        leaf_count: usize,
    },
    /// Proof-by-item lookup found no matching leaf.
    #[error("item not found in tree")]
    ItemNotFound,
    /// A serialized proof could not be decoded.
    #[error("invalid proof: {0}")]
    InvalidProof(String),
}

/// Alias for `core::result::Result<T, MerkleTreeError>`.
pub type Result<T> = core::result::Result<T, MerkleTreeError>;
