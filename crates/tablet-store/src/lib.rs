//! Content-addressed object storage for Tablet.
//!
//! Values are persisted beneath `<root>/.store/` in a git-like sharded
//! layout: a 40-character SHA-1 digest `356a19...` is stored at
//! `objects/35/6a19...`. Two kinds of blob share that scheme:
//!
//! - **Direct blobs** ([`Tablet::hash_object`]) are addressed by the digest
//!   of the value's display text and are written once (skip-on-exists).
//! - **Buckets** ([`Tablet::push`], [`Tablet::push_by`], [`Tablet::get`])
//!   are addressed by the digest of a key and hold every value ever pushed
//!   under it, rewritten in full on each push.
//!
//! Blob bytes are a serialized payload ([`Format`]) compressed with zstd,
//! with no header. A zero-length blob is an empty bucket.
//!
//! # Design Rules
//!
//! 1. The digest to path mapping is a pure function; no index is kept.
//! 2. Direct blobs are immutable once written; buckets are replace-on-write.
//! 3. A missing bucket reads as empty. Every other failure propagates.
//! 4. One writer per store directory. Pushes through a single handle are
//!    serialized; separate handles and processes are not coordinated.
//! 5. Filesystem access goes through the [`FileSystem`] trait.

pub mod bucket;
pub mod codec;
pub mod config;
pub mod error;
pub mod fs;
pub mod memory;
pub mod repository;
pub mod root;
pub mod tablet;

// Re-export primary types at crate root for ergonomic imports.
pub use bucket::BucketStore;
pub use codec::{BincodeFormat, Format, JsonFormat, ObjectCodec};
pub use config::{BucketLayout, StoreConfig, DEFAULT_COMPRESSION_LEVEL};
pub use error::{StoreError, StoreResult};
pub use fs::{FileSystem, OsFileSystem};
pub use memory::MemoryFileSystem;
pub use repository::BlobRepository;
pub use root::{StoreRoot, OBJECTS_DIR, SETS_DIR, STORE_DIR};
pub use tablet::Tablet;
pub use tablet_types::Digest;
