use folio_types::ContentHash;
use sha2::{Digest, Sha256};

/// Incremental SHA-256 content hasher.
///
/// Use [`ContentHasher::hash`] for a single buffer, or feed chunks through
/// [`update`](ContentHasher::update) when the content arrives in pieces.
#[derive(Clone, Default)]
pub struct ContentHasher {
    inner: Sha256,
}

impl ContentHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash a complete buffer.
    pub fn hash(data: &[u8]) -> ContentHash {
        ContentHash::from_digest(Sha256::digest(data).into())
    }

    /// Verify that data produces the expected content hash.
    pub fn verify(data: &[u8], expected: &ContentHash) -> bool {
        Self::hash(data) == *expected
    }

    pub fn update(&mut self, chunk: &[u8]) -> &mut Self {
        self.inner.update(chunk);
        self
    }

    pub fn finalize(self) -> ContentHash {
        ContentHash::from_digest(self.inner.finalize().into())
    }
}

impl std::fmt::Debug for ContentHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentHasher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn known_sha256_vectors() {
        assert_eq!(
            ContentHasher::hash(b"").to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            ContentHasher::hash(b"abc").to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn hash_is_deterministic() {
        let a = ContentHasher::hash(b"original content");
        let b = ContentHasher::hash(b"original content");
        assert_eq!(a, b);
    }

    #[test]
    fn different_content_differs() {
        assert_ne!(
            ContentHasher::hash(b"original content"),
            ContentHasher::hash(b"updated content")
        );
    }

    #[test]
    fn verify_detects_tampering() {
        let hash = ContentHasher::hash(b"page body");
        assert!(ContentHasher::verify(b"page body", &hash));
        assert!(!ContentHasher::verify(b"page b0dy", &hash));
    }

    proptest! {
        #[test]
        fn incremental_matches_one_shot(data in proptest::collection::vec(any::<u8>(), 0..512), split in 0usize..512) {
            let split = split.min(data.len());
            let mut hasher = ContentHasher::new();
            hasher.update(&data[..split]).update(&data[split..]);
            prop_assert_eq!(hasher.finalize(), ContentHasher::hash(&data));
        }
    }
}
