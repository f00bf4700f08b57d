use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Width of a digest in bytes (160 bits).
pub const DIGEST_LEN: usize = 20;

/// Width of the hex rendering of a digest.
pub const DIGEST_HEX_LEN: usize = DIGEST_LEN * 2;

/// Number of leading hex characters used as the shard directory name.
pub const SHARD_PREFIX_LEN: usize = 2;

/// Content or key identifier for anything held in the store.
///
/// A `Digest` is the SHA-1 hash of either a value's display text or of a
/// caller-supplied key. The mapping from digest to on-disk path is a pure
/// function: see [`Digest::shard_prefix`] and [`Digest::shard_suffix`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    /// Wrap a pre-computed hash.
    pub const fn from_hash(hash: [u8; DIGEST_LEN]) -> Self {
        Self(hash)
    }

    /// The raw 20-byte hash.
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Lowercase hex rendering, always [`DIGEST_HEX_LEN`] characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Shard directory name: the first two hex characters.
    pub fn shard_prefix(&self) -> String {
        hex::encode(&self.0[..1])
    }

    /// File name inside the shard: the remaining 38 hex characters.
    pub fn shard_suffix(&self) -> String {
        hex::encode(&self.0[1..])
    }

    /// Parse from a hex string. Upper-case input is accepted.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != DIGEST_LEN {
            return Err(TypeError::InvalidLength {
                expected: DIGEST_LEN,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; DIGEST_LEN];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.short_hex())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl std::str::FromStr for Digest {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; DIGEST_LEN]> for Digest {
    fn from(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }
}

impl From<Digest> for [u8; DIGEST_LEN] {
    fn from(digest: Digest) -> Self {
        digest.0
    }
}
