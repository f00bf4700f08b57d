//! Foundation types for the Tablet object store.
//!
//! Every stored blob and every keyed bucket is addressed by a [`Digest`], a
//! 160-bit hash rendered as 40 lowercase hex characters. The first two
//! characters name the shard directory and the remaining 38 name the file.

pub mod digest;
pub mod error;

pub use digest::{Digest, DIGEST_LEN, DIGEST_HEX_LEN, SHARD_PREFIX_LEN};
pub use error::TypeError;
