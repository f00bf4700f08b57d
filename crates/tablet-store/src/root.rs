use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::config::BucketLayout;
use crate::error::{StoreError, StoreResult};
use crate::fs::FileSystem;

/// Name of the store directory created under the root.
pub const STORE_DIR: &str = ".store";
/// Direct content blobs (and buckets, in the consolidated layout).
pub const OBJECTS_DIR: &str = "objects";
/// Keyed buckets in the legacy layout.
pub const SETS_DIR: &str = "sets";

/// Owns the `<root>/.store` directory layout.
///
/// ```text
/// <root>/.store/
///   objects/<2-hex>/<38-hex>
///   sets/<2-hex>/<38-hex>      (legacy layout only)
/// ```
#[derive(Clone)]
pub struct StoreRoot {
    root: PathBuf,
    layout: BucketLayout,
    fs: Arc<dyn FileSystem>,
}

impl StoreRoot {
    pub fn new(root: impl Into<PathBuf>, layout: BucketLayout, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            root: root.into(),
            layout,
            fs,
        }
    }

    /// Create the store directory and its children.
    ///
    /// Fails with [`StoreError::AlreadyInitialized`] if `<root>/.store`
    /// already exists. A partially created layout is not repaired.
    pub fn initialize(&self) -> StoreResult<()> {
        let store_dir = self.store_dir();
        if self.fs.dir_exists(&store_dir) {
            return Err(StoreError::AlreadyInitialized(store_dir));
        }

        self.fs.create_dir_all(&store_dir)?;
        self.fs.create_dir_all(&self.objects_dir())?;
        if self.layout == BucketLayout::Legacy {
            self.fs.create_dir_all(&self.sets_dir())?;
        }

        info!(path = %store_dir.display(), layout = ?self.layout, "initialized store");
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.fs.dir_exists(&self.store_dir())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn layout(&self) -> BucketLayout {
        self.layout
    }

    pub fn file_system(&self) -> &Arc<dyn FileSystem> {
        &self.fs
    }

    pub fn store_dir(&self) -> PathBuf {
        self.root.join(STORE_DIR)
    }

    pub fn objects_dir(&self) -> PathBuf {
        self.store_dir().join(OBJECTS_DIR)
    }

    pub fn sets_dir(&self) -> PathBuf {
        self.store_dir().join(SETS_DIR)
    }

    /// Directory holding keyed buckets for the configured layout.
    pub fn buckets_dir(&self) -> PathBuf {
        match self.layout {
            BucketLayout::Consolidated => self.objects_dir(),
            BucketLayout::Legacy => self.sets_dir(),
        }
    }
}

impl std::fmt::Debug for StoreRoot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreRoot")
            .field("root", &self.root)
            .field("layout", &self.layout)
            .finish()
    }
}
