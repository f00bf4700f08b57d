use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::DEFAULT_COMPRESSION_LEVEL;
use crate::error::{StoreError, StoreResult};

/// Serialization scheme used beneath the compression pass.
///
/// The store never inspects payloads; any format that round-trips the
/// caller's types is acceptable. Payloads are not tagged with the format
/// that produced them.
pub trait Format: Send + Sync {
    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> StoreResult<Vec<u8>>;
    fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> StoreResult<T>;
}

/// Compact binary encoding via `bincode`. Requires statically known shapes.
#[derive(Clone, Copy, Debug, Default)]
pub struct BincodeFormat;

impl Format for BincodeFormat {
    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> StoreResult<Vec<u8>> {
        bincode::serialize(value).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> StoreResult<T> {
        bincode::deserialize(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}

/// Self-describing JSON encoding. Works with `serde_json::Value`.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonFormat;

impl Format for JsonFormat {
    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> StoreResult<Vec<u8>> {
        serde_json::to_vec(value).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> StoreResult<T> {
        serde_json::from_slice(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}

/// Serialize-then-compress codec for blob payloads.
///
/// Blob bytes are a bare zstd stream: no header, magic, or version tag.
#[derive(Clone, Debug)]
pub struct ObjectCodec<F = BincodeFormat> {
    format: F,
    level: i32,
}

impl<F: Format + Default> Default for ObjectCodec<F> {
    fn default() -> Self {
        Self::new(F::default(), DEFAULT_COMPRESSION_LEVEL)
    }
}

impl<F: Format> ObjectCodec<F> {
    pub fn new(format: F, level: i32) -> Self {
        Self { format, level }
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    /// Serialize `value` and compress the result.
    pub fn encode<T: Serialize + ?Sized>(&self, value: &T) -> StoreResult<Vec<u8>> {
        let raw = self.format.serialize(value)?;
        zstd::encode_all(raw.as_slice(), self.level)
            .map_err(|e| StoreError::Compression(e.to_string()))
    }

    /// Decompress and deserialize.
    ///
    /// A zero-length input, or one that decompresses to nothing, yields
    /// `T::default()`.
    pub fn decode<T: DeserializeOwned + Default>(&self, bytes: &[u8]) -> StoreResult<T> {
        if bytes.is_empty() {
            return Ok(T::default());
        }
        let raw =
            zstd::decode_all(bytes).map_err(|e| StoreError::Compression(e.to_string()))?;
        if raw.is_empty() {
            return Ok(T::default());
        }
        self.format.deserialize(&raw)
    }
}
