use std::fmt::Display;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tablet_crypto::ContentHasher;
use tablet_types::Digest;
use tracing::debug;

use crate::bucket::BucketStore;
use crate::codec::{BincodeFormat, Format, ObjectCodec};
use crate::config::StoreConfig;
use crate::error::StoreResult;
use crate::fs::{FileSystem, OsFileSystem};
use crate::repository::BlobRepository;
use crate::root::StoreRoot;

/// A content-addressed object store rooted at one directory.
///
/// Composes the store root, a sharded blob repository for direct content
/// blobs, and a [`BucketStore`] for keyed lists. Call [`Tablet::init`] once
/// before anything else; operations on an uninitialized root create the
/// shard directories they need but the layout will be incomplete.
pub struct Tablet<F = BincodeFormat> {
    config: StoreConfig,
    root: StoreRoot,
    objects: BlobRepository,
    codec: ObjectCodec<F>,
    buckets: BucketStore<F>,
}

impl Tablet<BincodeFormat> {
    /// Open a store on the host filesystem with the default binary format.
    pub fn open(config: StoreConfig) -> Self {
        Self::with_file_system(config, Arc::new(OsFileSystem))
    }

    /// Open a store on an injected filesystem with the default binary format.
    pub fn with_file_system(config: StoreConfig, fs: Arc<dyn FileSystem>) -> Self {
        Self::with_format(config, fs, BincodeFormat)
    }
}

impl<F: Format + Clone> Tablet<F> {
    /// Open a store with an explicit payload format.
    pub fn with_format(config: StoreConfig, fs: Arc<dyn FileSystem>, format: F) -> Self {
        let root = StoreRoot::new(config.root.clone(), config.layout, fs.clone());
        let objects = BlobRepository::new(root.objects_dir(), fs.clone());
        let codec = ObjectCodec::new(format, config.compression_level);
        let buckets = BucketStore::new(BlobRepository::new(root.buckets_dir(), fs), codec.clone());
        Self {
            config,
            root,
            objects,
            codec,
            buckets,
        }
    }
}

impl<F: Format> Tablet<F> {
    /// Create `<root>/.store` and its subdirectories.
    pub fn init(&self) -> StoreResult<()> {
        self.root.initialize()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn root(&self) -> &StoreRoot {
        &self.root
    }

    pub fn objects(&self) -> &BlobRepository {
        &self.objects
    }

    pub fn buckets(&self) -> &BucketStore<F> {
        &self.buckets
    }

    /// Store `value` as a direct content blob and return its digest.
    ///
    /// The digest comes from the value's display text; the blob holds the
    /// encoded value. An existing blob at that digest is left untouched.
    pub fn hash_object<T>(&self, value: &T) -> StoreResult<Digest>
    where
        T: Display + Serialize + ?Sized,
    {
        let digest = ContentHasher::hash_display(value);
        let bytes = self.codec.encode(value)?;
        if !self.objects.write(&digest, &bytes)? {
            debug!(digest = %digest.short_hex(), "object already stored");
        }
        Ok(digest)
    }

    /// Read back a direct content blob stored by [`Tablet::hash_object`].
    pub fn read_object<T>(&self, digest: &Digest) -> StoreResult<T>
    where
        T: DeserializeOwned + Default,
    {
        let bytes = self.objects.read(digest)?;
        self.codec.decode(&bytes)
    }

    /// Append `value` to the bucket for `key`.
    pub fn push<T, K>(&self, value: T, key: &K) -> StoreResult<Digest>
    where
        T: Serialize + DeserializeOwned,
        K: Display + ?Sized,
    {
        self.buckets.push(value, key)
    }

    /// Append `value` to the bucket for the key `projection` extracts from it.
    pub fn push_by<T, K, P>(&self, value: T, projection: P) -> StoreResult<Digest>
    where
        T: Serialize + DeserializeOwned,
        K: Display,
        P: FnOnce(&T) -> K,
    {
        self.buckets.push_by(value, projection)
    }

    /// Every value pushed under `key`, in push order.
    pub fn get<T, K>(&self, key: &K) -> StoreResult<Vec<T>>
    where
        T: DeserializeOwned,
        K: Display + ?Sized,
    {
        self.buckets.get(key)
    }
}

impl<F> std::fmt::Debug for Tablet<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tablet")
            .field("root", &self.root)
            .field("objects", &self.objects)
            .finish()
    }
}
