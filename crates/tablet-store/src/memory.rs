use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::fs::FileSystem;

#[derive(Default)]
struct Tree {
    dirs: BTreeSet<PathBuf>,
    files: BTreeMap<PathBuf, Vec<u8>>,
}

/// In-memory [`FileSystem`].
///
/// Intended for tests and embedding. Directories and files live behind a
/// `RwLock`; contents are cloned on read and write. Paths are compared
/// verbatim, with no normalization.
pub struct MemoryFileSystem {
    tree: RwLock<Tree>,
}

impl MemoryFileSystem {
    /// Create a new empty filesystem.
    pub fn new() -> Self {
        Self {
            tree: RwLock::new(Tree::default()),
        }
    }

    /// Number of files currently stored.
    pub fn file_count(&self) -> usize {
        self.tree.read().expect("lock poisoned").files.len()
    }

    /// Sorted list of every file path.
    pub fn file_paths(&self) -> Vec<PathBuf> {
        self.tree
            .read()
            .expect("lock poisoned")
            .files
            .keys()
            .cloned()
            .collect()
    }

    /// Sorted list of every directory path.
    pub fn dir_paths(&self) -> Vec<PathBuf> {
        self.tree
            .read()
            .expect("lock poisoned")
            .dirs
            .iter()
            .cloned()
            .collect()
    }
}

impl Default for MemoryFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MemoryFileSystem {
    fn dir_exists(&self, path: &Path) -> bool {
        self.tree.read().expect("lock poisoned").dirs.contains(path)
    }

    fn file_exists(&self, path: &Path) -> bool {
        self.tree
            .read()
            .expect("lock poisoned")
            .files
            .contains_key(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut tree = self.tree.write().expect("lock poisoned");
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            if tree.files.contains_key(ancestor) {
                return Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("{} is a file", ancestor.display()),
                ));
            }
            tree.dirs.insert(ancestor.to_path_buf());
        }
        Ok(())
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.tree
            .read()
            .expect("lock poisoned")
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| not_found(path))
    }

    fn write(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        let mut tree = self.tree.write().expect("lock poisoned");
        let parent_present = path
            .parent()
            .map(|parent| parent.as_os_str().is_empty() || tree.dirs.contains(parent))
            .unwrap_or(false);
        if !parent_present {
            return Err(not_found(path));
        }
        if tree.dirs.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} is a directory", path.display()),
            ));
        }
        tree.files.insert(path.to_path_buf(), data.to_vec());
        Ok(())
    }
}

impl std::fmt::Debug for MemoryFileSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tree = self.tree.read().expect("lock poisoned");
        f.debug_struct("MemoryFileSystem")
            .field("dir_count", &tree.dirs.len())
            .field("file_count", &tree.files.len())
            .finish()
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{} not found", path.display()),
    )
}
