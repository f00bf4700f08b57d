use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Directory and file primitives the store is built on.
///
/// Implementations must report a missing file, or a missing parent
/// directory, as [`io::ErrorKind::NotFound`]. The store relies on that kind
/// to tell "no bucket yet" apart from real failures.
pub trait FileSystem: Send + Sync {
    /// Whether `path` exists and is a directory.
    fn dir_exists(&self, path: &Path) -> bool;

    /// Whether `path` exists and is a regular file.
    fn file_exists(&self, path: &Path) -> bool;

    /// Create `path` and any missing ancestors. Existing directories are fine.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Read the whole file at `path`.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Create or truncate the file at `path` and write `data` to it.
    ///
    /// The parent directory must already exist.
    fn write(&self, path: &Path, data: &[u8]) -> io::Result<()>;
}

/// [`FileSystem`] backed by the host filesystem.
///
/// Writes are staged in a temporary file in the destination directory and
/// renamed over the target, so readers see either the old or the new bytes.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn dir_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn write(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        let parent = path.parent().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "path has no parent directory")
        })?;
        let mut staged = tempfile::NamedTempFile::new_in(parent)?;
        staged.write_all(data)?;
        staged.flush()?;
        staged.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob");
        OsFileSystem.write(&path, b"hello").unwrap();
        assert!(OsFileSystem.file_exists(&path));
        assert_eq!(OsFileSystem.read(&path).unwrap(), b"hello");
    }

    #[test]
    fn write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob");
        OsFileSystem.write(&path, b"first version").unwrap();
        OsFileSystem.write(&path, b"second").unwrap();
        assert_eq!(OsFileSystem.read(&path).unwrap(), b"second");
    }

    #[test]
    fn write_into_missing_directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("blob");
        let err = OsFileSystem.write(&path, b"x").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn read_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = OsFileSystem.read(&dir.path().join("nope")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn create_dir_all_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        OsFileSystem.create_dir_all(&nested).unwrap();
        OsFileSystem.create_dir_all(&nested).unwrap();
        assert!(OsFileSystem.dir_exists(&nested));
        assert!(!OsFileSystem.file_exists(&nested));
    }
}
