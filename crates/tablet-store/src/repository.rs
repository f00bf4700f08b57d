use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tablet_types::Digest;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::fs::FileSystem;

/// Blob storage sharded by digest prefix.
///
/// A digest `356a19...28ab` maps to `<base>/35/6a19...28ab`. The mapping is
/// computed, never stored.
#[derive(Clone)]
pub struct BlobRepository {
    base: PathBuf,
    fs: Arc<dyn FileSystem>,
}

impl BlobRepository {
    pub fn new(base: impl Into<PathBuf>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            base: base.into(),
            fs,
        }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Shard directory for `digest`.
    pub fn shard_dir(&self, digest: &Digest) -> PathBuf {
        self.base.join(digest.shard_prefix())
    }

    /// Full blob path for `digest`.
    pub fn path_for(&self, digest: &Digest) -> PathBuf {
        self.shard_dir(digest).join(digest.shard_suffix())
    }

    pub fn exists(&self, digest: &Digest) -> bool {
        self.fs.dir_exists(&self.shard_dir(digest)) && self.fs.file_exists(&self.path_for(digest))
    }

    /// Write `data` unless a blob already exists at `digest`.
    ///
    /// Returns `true` if bytes were written. Existing content is not
    /// compared against `data`.
    pub fn write(&self, digest: &Digest, data: &[u8]) -> StoreResult<bool> {
        if self.exists(digest) {
            debug!(digest = %digest.short_hex(), "blob exists; skipping write");
            return Ok(false);
        }
        self.put(digest, data)?;
        Ok(true)
    }

    /// Write `data` at `digest`, replacing any existing blob.
    pub fn overwrite(&self, digest: &Digest, data: &[u8]) -> StoreResult<()> {
        self.put(digest, data)
    }

    /// Read the blob at `digest`.
    ///
    /// A missing shard directory or file is [`StoreError::NotFound`].
    pub fn read(&self, digest: &Digest) -> StoreResult<Vec<u8>> {
        match self.fs.read(&self.path_for(digest)) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StoreError::NotFound(*digest)),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&self, digest: &Digest, data: &[u8]) -> StoreResult<()> {
        self.fs.create_dir_all(&self.shard_dir(digest))?;
        self.fs.write(&self.path_for(digest), data)?;
        debug!(digest = %digest.short_hex(), len = data.len(), "blob written");
        Ok(())
    }
}

impl std::fmt::Debug for BlobRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobRepository")
            .field("base", &self.base)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryFileSystem;
    use tablet_crypto::ContentHasher;

    fn repo() -> (Arc<MemoryFileSystem>, BlobRepository) {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.create_dir_all(Path::new("/tmp/.store/objects")).unwrap();
        let repo = BlobRepository::new("/tmp/.store/objects", fs.clone());
        (fs, repo)
    }

    #[test]
    fn path_is_sharded_by_prefix() {
        let (_fs, repo) = repo();
        let digest = ContentHasher::hash_display(&1);
        assert_eq!(
            repo.path_for(&digest),
            PathBuf::from("/tmp/.store/objects/35/6a192b7913b04c54574d18c28d46e6395428ab")
        );
    }

    #[test]
    fn write_creates_shard_and_file() {
        let (fs, repo) = repo();
        let digest = ContentHasher::hash(b"content");
        assert!(!repo.exists(&digest));
        assert!(repo.write(&digest, b"payload").unwrap());
        assert!(repo.exists(&digest));
        assert!(fs.dir_exists(&repo.shard_dir(&digest)));
        assert_eq!(repo.read(&digest).unwrap(), b"payload");
    }

    #[test]
    fn write_skips_existing_blob() {
        let (_fs, repo) = repo();
        let digest = ContentHasher::hash(b"content");
        assert!(repo.write(&digest, b"first").unwrap());
        assert!(!repo.write(&digest, b"second").unwrap());
        assert_eq!(repo.read(&digest).unwrap(), b"first");
    }

    #[test]
    fn overwrite_replaces_existing_blob() {
        let (_fs, repo) = repo();
        let digest = ContentHasher::hash(b"key");
        repo.overwrite(&digest, b"first").unwrap();
        repo.overwrite(&digest, b"second").unwrap();
        assert_eq!(repo.read(&digest).unwrap(), b"second");
    }

    #[test]
    fn second_blob_in_existing_shard() {
        let (fs, repo) = repo();
        let a = Digest::from_hex("35aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa").unwrap();
        let b = Digest::from_hex("35bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb").unwrap();
        repo.write(&a, b"a").unwrap();
        repo.write(&b, b"b").unwrap();
        assert_eq!(fs.file_count(), 2);
        assert_eq!(repo.read(&a).unwrap(), b"a");
        assert_eq!(repo.read(&b).unwrap(), b"b");
    }

    #[test]
    fn read_missing_blob_is_not_found() {
        let (_fs, repo) = repo();
        let digest = ContentHasher::hash(b"never written");
        let err = repo.read(&digest).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(d) if d == digest));
    }

    #[test]
    fn write_into_uninitialized_base_creates_shard() {
        let fs = Arc::new(MemoryFileSystem::new());
        let repo = BlobRepository::new("/fresh/objects", fs.clone());
        let digest = ContentHasher::hash(b"x");
        repo.write(&digest, b"x").unwrap();
        assert!(fs.dir_exists(Path::new("/fresh/objects")));
    }
}
