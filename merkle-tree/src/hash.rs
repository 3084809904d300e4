//! Hash function capability and the digest type it produces.
//!
//! The tree is hash-agnostic: anything implementing [`HashFunction`] can be
//! plugged in. Internal nodes are always `digest(left ++ right)`, where `++`
//! is byte-level concatenation of the two child digests.

use std::{fmt, str::FromStr};

use bincode::{Decode, Encode};
use sha2::{Digest as _, Sha256};

use crate::{MerkleTreeError, Result};

/// Output of a [`HashFunction`].
///
/// Backed by a byte vector so that different hash functions may produce
/// digests of different sizes.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Encode, Decode)]
pub struct Digest(Vec<u8>);

impl Digest {
    /// Wrap raw digest bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Digest(bytes)
    }

    /// Parse a digest from its hex encoding.
    pub fn from_hex(encoded: &str) -> Result<Self> {
        hex::decode(encoded.trim())
            .map(Digest)
            .map_err(|e| MerkleTreeError::InvalidInput(format!("bad hex digest: {}", e)))
    }

    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume the digest and return its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Number of bytes in this digest.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the digest holds no bytes at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Full lowercase hex encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Hex encoding of at most the first `bytes` bytes.
    pub fn short_hex(&self, bytes: usize) -> String {
        hex::encode(&self.0[..bytes.min(self.0.len())])
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Digest {
    fn from(bytes: Vec<u8>) -> Self {
        Digest(bytes)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Digest {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Digest {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let encoded = <String as serde::Deserialize>::deserialize(deserializer)?;
        hex::decode(&encoded)
            .map(Digest)
            .map_err(serde::de::Error::custom)
    }
}

/// A deterministic, fixed-output-size hash function.
///
/// Must be pure: the same input always yields the same digest, and every
/// digest it returns is exactly [`digest_size`](Self::digest_size) bytes.
pub trait HashFunction {
    /// Hash an arbitrary byte sequence.
    fn digest(&self, bytes: &[u8]) -> Digest;

    /// Size in bytes of every digest this function produces.
    fn digest_size(&self) -> usize;

    /// Short identifier used in logs and rendered output.
    fn name(&self) -> &'static str;

    /// Parent digest of two children: `digest(left ++ right)`.
    fn combine(&self, left: &Digest, right: &Digest) -> Digest {
        let mut buf = Vec::with_capacity(left.len() + right.len());
        buf.extend_from_slice(left.as_bytes());
        buf.extend_from_slice(right.as_bytes());
        self.digest(&buf)
    }
}

impl<H: HashFunction + ?Sized> HashFunction for &H {
    fn digest(&self, bytes: &[u8]) -> Digest {
        (**self).digest(bytes)
    }

    fn digest_size(&self) -> usize {
        (**self).digest_size()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn combine(&self, left: &Digest, right: &Digest) -> Digest {
        (**self).combine(left, right)
    }
}

/// Blake3, 32-byte output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Blake3Hash;

impl HashFunction for Blake3Hash {
    fn digest(&self, bytes: &[u8]) -> Digest {
        Digest(blake3::hash(bytes).as_bytes().to_vec())
    }

    fn combine(&self, left: &Digest, right: &Digest) -> Digest {
        let mut hasher = blake3::Hasher::new();
        hasher.update(left.as_bytes());
        hasher.update(right.as_bytes());
        Digest(hasher.finalize().as_bytes().to_vec())
    }

    fn digest_size(&self) -> usize {
        blake3::OUT_LEN
    }

    fn name(&self) -> &'static str {
        "blake3"
    }
}

/// SHA-256, 32-byte output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sha256Hash;

impl HashFunction for Sha256Hash {
    fn digest(&self, bytes: &[u8]) -> Digest {
        Digest(Sha256::digest(bytes).to_vec())
    }

    fn combine(&self, left: &Digest, right: &Digest) -> Digest {
        let mut hasher = Sha256::new();
        hasher.update(left.as_bytes());
        hasher.update(right.as_bytes());
        Digest(hasher.finalize().to_vec())
    }

    fn digest_size(&self) -> usize {
        32
    }

    fn name(&self) -> &'static str {
        "sha256"
    }
}

/// 32-bit rolling hash (`h = h * 31 + byte`, wrapping), emitted big-endian.
///
/// Not collision resistant. Only useful for small fixed test vectors and
/// demos where short digests are easier to read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RollingHash;

impl HashFunction for RollingHash {
    fn digest(&self, bytes: &[u8]) -> Digest {
        let h = bytes
            .iter()
            .fold(0u32, |h, &b| (h << 5).wrapping_sub(h).wrapping_add(b as u32));
        Digest(h.to_be_bytes().to_vec())
    }

    fn digest_size(&self) -> usize {
        4
    }

    fn name(&self) -> &'static str {
        "rolling"
    }
}

/// Runtime-selectable hash function.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HashAlgorithm {
    /// [`Blake3Hash`]
    #[default]
    Blake3,
    /// [`Sha256Hash`]
    Sha256,
    /// [`RollingHash`]
    Rolling,
}

impl HashFunction for HashAlgorithm {
    fn digest(&self, bytes: &[u8]) -> Digest {
        match self {
            HashAlgorithm::Blake3 => Blake3Hash.digest(bytes),
            HashAlgorithm::Sha256 => Sha256Hash.digest(bytes),
            HashAlgorithm::Rolling => RollingHash.digest(bytes),
        }
    }

    fn combine(&self, left: &Digest, right: &Digest) -> Digest {
        match self {
            HashAlgorithm::Blake3 => Blake3Hash.combine(left, right),
            HashAlgorithm::Sha256 => Sha256Hash.combine(left, right),
            HashAlgorithm::Rolling => RollingHash.combine(left, right),
        }
    }

    fn digest_size(&self) -> usize {
        match self {
            HashAlgorithm::Blake3 => Blake3Hash.digest_size(),
            HashAlgorithm::Sha256 => Sha256Hash.digest_size(),
            HashAlgorithm::Rolling => RollingHash.digest_size(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Blake3 => Blake3Hash.name(),
            HashAlgorithm::Sha256 => Sha256Hash.name(),
            HashAlgorithm::Rolling => RollingHash.name(),
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = MerkleTreeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "blake3" => Ok(HashAlgorithm::Blake3),
            "sha256" | "sha-256" => Ok(HashAlgorithm::Sha256),
            "rolling" => Ok(HashAlgorithm::Rolling),
            other => Err(MerkleTreeError::InvalidInput(format!(
                "unknown hash algorithm {:?} (expected blake3, sha256 or rolling)",
                other
            ))),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
