use std::fmt::Display;

use sha1::{Digest as _, Sha1};
use tablet_types::{Digest, DIGEST_LEN};

/// SHA-1 content hasher.
///
/// The hasher is stateless; every digest is a pure function of its input
/// bytes. Both value digests and key digests go through
/// [`ContentHasher::hash_display`] so the two always agree for equal text.
#[derive(Clone, Copy, Debug, Default)]
pub struct ContentHasher;

impl ContentHasher {
    /// Hash raw bytes.
    pub fn hash(data: &[u8]) -> Digest {
        let mut hasher = Sha1::new();
        hasher.update(data);
        let mut out = [0u8; DIGEST_LEN];
        out.copy_from_slice(&hasher.finalize());
        Digest::from_hash(out)
    }

    /// Hash the UTF-8 display text of a value or key.
    pub fn hash_display<T: Display + ?Sized>(value: &T) -> Digest {
        Self::hash(value.to_string().as_bytes())
    }

    /// Verify that data produces the expected digest.
    pub fn verify(data: &[u8], expected: &Digest) -> bool {
        Self::hash(data) == *expected
    }
}
