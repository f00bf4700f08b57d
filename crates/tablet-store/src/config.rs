use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Default zstd level for blob payloads.
pub const DEFAULT_COMPRESSION_LEVEL: i32 = 3;

/// Where keyed buckets live beneath the store directory.
///
/// The two layouts are not compatible with each other: a store written with
/// one cannot be read with the other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketLayout {
    /// Buckets share the `objects/` tree with direct content blobs.
    ///
    /// A bucket keyed `k` and a direct blob of a value displaying as `k` map
    /// to the same file, so only bucket-only stores should use this layout.
    Consolidated,
    /// Buckets live in a separate `sets/` tree.
    #[default]
    Legacy,
}

/// Configuration for a [`Tablet`](crate::Tablet) store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory that will contain the `.store` directory.
    pub root: PathBuf,
    /// Bucket placement.
    pub layout: BucketLayout,
    /// zstd compression level applied to every blob.
    pub compression_level: i32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            layout: BucketLayout::default(),
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

impl StoreConfig {
    /// Default configuration rooted at `root`.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Set the bucket layout.
    pub fn with_layout(mut self, layout: BucketLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Parse a TOML document. Missing keys fall back to defaults.
    pub fn from_toml_str(s: &str) -> StoreResult<Self> {
        toml::from_str(s).map_err(|e| StoreError::Config(e.to_string()))
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> StoreResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| StoreError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> StoreResult<String> {
        toml::to_string(self).map_err(|e| StoreError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = StoreConfig::default();
        assert_eq!(c.root, PathBuf::from("."));
        assert_eq!(c.layout, BucketLayout::Legacy);
        assert_eq!(c.compression_level, 3);
    }

    #[test]
    fn parse_full_document() {
        let c = StoreConfig::from_toml_str(
            r#"
            root = "/var/lib/tablet"
            layout = "consolidated"
            compression_level = 9
            "#,
        )
        .unwrap();
        assert_eq!(c.root, PathBuf::from("/var/lib/tablet"));
        assert_eq!(c.layout, BucketLayout::Consolidated);
        assert_eq!(c.compression_level, 9);
    }

    #[test]
    fn missing_keys_use_defaults() {
        let c = StoreConfig::from_toml_str(r#"root = "/data""#).unwrap();
        assert_eq!(c.root, PathBuf::from("/data"));
        assert_eq!(c.layout, BucketLayout::Legacy);
        assert_eq!(c.compression_level, DEFAULT_COMPRESSION_LEVEL);
    }

    #[test]
    fn unknown_layout_is_rejected() {
        let err = StoreConfig::from_toml_str(r#"layout = "flat""#).unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tablet.toml");
        std::fs::write(&path, "layout = \"consolidated\"\n").unwrap();
        let c = StoreConfig::load(&path).unwrap();
        assert_eq!(c.layout, BucketLayout::Consolidated);
    }

    #[test]
    fn load_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = StoreConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn toml_roundtrip() {
        let c = StoreConfig::at("/srv/store").with_layout(BucketLayout::Consolidated);
        let text = c.to_toml_string().unwrap();
        assert_eq!(StoreConfig::from_toml_str(&text).unwrap(), c);
    }
}
