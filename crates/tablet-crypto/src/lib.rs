//! Content hashing for the Tablet object store.
//!
//! Digests are SHA-1 over UTF-8 text. Values and keys share the same
//! convention (their `Display` text), so a value pushed under key `1` can be
//! fetched with the raw integer `1`.

pub mod hasher;

pub use hasher::ContentHasher;
