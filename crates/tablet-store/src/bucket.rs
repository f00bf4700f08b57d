use std::fmt::Display;
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tablet_crypto::ContentHasher;
use tablet_types::Digest;
use tracing::debug;

use crate::codec::{BincodeFormat, Format, ObjectCodec};
use crate::error::{StoreError, StoreResult};
use crate::repository::BlobRepository;

/// Append-only lists of values grouped under a key digest.
///
/// Each bucket is one blob holding the full encoded `Vec<T>`. A push reads
/// the whole list, appends, and rewrites the blob in place; the digest comes
/// from the key, so the path never changes while the content does.
///
/// # Single writer
///
/// Pushes made through one `BucketStore` are serialized by an internal
/// mutex. Nothing coordinates two stores over the same directory, or two
/// processes: concurrent pushes to the same key from different handles can
/// lose appends (last writer wins). Reads never take the lock.
pub struct BucketStore<F = BincodeFormat> {
    repo: BlobRepository,
    codec: ObjectCodec<F>,
    write_lock: Mutex<()>,
}

impl<F: Format> BucketStore<F> {
    pub fn new(repo: BlobRepository, codec: ObjectCodec<F>) -> Self {
        Self {
            repo,
            codec,
            write_lock: Mutex::new(()),
        }
    }

    pub fn repository(&self) -> &BlobRepository {
        &self.repo
    }

    /// Append `value` to the bucket for `key` and return the key digest.
    pub fn push<T, K>(&self, value: T, key: &K) -> StoreResult<Digest>
    where
        T: Serialize + DeserializeOwned,
        K: Display + ?Sized,
    {
        let digest = ContentHasher::hash_display(key);
        let _guard = self.write_lock.lock().expect("bucket lock poisoned");

        let mut bucket: Vec<T> = self.load(&digest)?;
        bucket.push(value);

        let bytes = self.codec.encode(&bucket)?;
        self.repo.overwrite(&digest, &bytes)?;

        debug!(digest = %digest.short_hex(), entries = bucket.len(), "bucket rewritten");
        Ok(digest)
    }

    /// Append `value` under the key produced by `projection`.
    pub fn push_by<T, K, P>(&self, value: T, projection: P) -> StoreResult<Digest>
    where
        T: Serialize + DeserializeOwned,
        K: Display,
        P: FnOnce(&T) -> K,
    {
        let key = projection(&value);
        self.push(value, &key)
    }

    /// Every value pushed under `key`, in push order.
    ///
    /// A key that was never pushed yields an empty list.
    pub fn get<T, K>(&self, key: &K) -> StoreResult<Vec<T>>
    where
        T: DeserializeOwned,
        K: Display + ?Sized,
    {
        self.load(&ContentHasher::hash_display(key))
    }

    fn load<T: DeserializeOwned>(&self, digest: &Digest) -> StoreResult<Vec<T>> {
        match self.repo.read(digest) {
            Ok(bytes) => self.codec.decode(&bytes),
            Err(StoreError::NotFound(_)) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }
}

impl<F> std::fmt::Debug for BucketStore<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BucketStore")
            .field("repo", &self.repo)
            .finish()
    }
}
