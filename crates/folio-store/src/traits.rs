use bytes::Bytes;
use folio_types::ContentHash;

use crate::error::{StoreError, StoreResult};

/// Content-addressed blob store.
///
/// All implementations must satisfy these invariants:
/// - The key of a blob is `sha256(bytes)` rendered as a [`ContentHash`].
/// - Blobs are immutable once written; `put` of existing content is a no-op
///   that returns the same key.
/// - Concurrent reads and writes are always safe.
/// - All I/O errors are propagated, never silently ignored.
pub trait BlobStore: Send + Sync {
    /// Store `data` and return its content hash.
    fn put(&self, data: &[u8]) -> StoreResult<ContentHash>;

    /// Read a blob by its content hash.
    ///
    /// Returns `Ok(None)` if the blob does not exist.
    /// Returns `Err` on I/O failure or data corruption.
    fn get(&self, hash: &ContentHash) -> StoreResult<Option<Bytes>>;

    /// Check whether a blob exists in the store.
    fn exists(&self, hash: &ContentHash) -> StoreResult<bool>;

    /// Read a blob, treating absence as [`StoreError::NotFound`].
    fn fetch(&self, hash: &ContentHash) -> StoreResult<Bytes> {
        self.get(hash)?.ok_or(StoreError::NotFound(*hash))
    }

    /// Store multiple blobs and return their hashes in input order.
    ///
    /// Default implementation calls `put()` for each blob.
    fn put_batch(&self, blobs: &[&[u8]]) -> StoreResult<Vec<ContentHash>> {
        blobs.iter().map(|data| self.put(data)).collect()
    }
}
