//! 32-byte content hash.

use sbor::prelude::*;
use std::fmt;

/// Errors parsing a hex-encoded hash.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HexError {
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

/// A blake3 digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, BasicSbor)]
#[sbor(transparent)]
pub struct Hash([u8; 32]);

impl Hash {
    /// Length of a hash in bytes.
    pub const LENGTH: usize = 32;

    /// The all-zero hash.
    pub const ZERO: Self = Hash([0u8; 32]);

    /// Hash arbitrary data.
    pub fn from_bytes(data: &[u8]) -> Self {
        Hash(*blake3::hash(data).as_bytes())
    }

    /// Hash several byte slices as if they were concatenated.
    pub fn from_parts(parts: &[&[u8]]) -> Self {
        let mut hasher = blake3::Hasher::new();
        for part in parts {
            hasher.update(part);
        }
        Hash(*hasher.finalize().as_bytes())
    }

    /// Wrap raw digest bytes without hashing them.
    pub fn from_hash_bytes(bytes: &[u8; 32]) -> Self {
        Hash(*bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a hex string, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, HexError> {
        let bytes = hex::decode(s.trim_start_matches("0x"))?;
        let array: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| HexError::InvalidLength {
                expected: Self::LENGTH,
                actual: bytes.len(),
            })?;
        Ok(Hash(array))
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // First 8 bytes are enough to tell hashes apart in logs.
        write!(f, "Hash({}..)", hex::encode(&self.0[..8]))
    }
}
