use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use bytes::Bytes;
use folio_crypto::ContentHasher;
use folio_types::ContentHash;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::BlobStore;

/// In-memory, HashMap-based blob store.
///
/// Intended for tests and embedding. Blobs are held as [`Bytes`], so reads
/// hand out cheap reference-counted views instead of copies.
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<ContentHash, Bytes>>,
}

impl InMemoryBlobStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
        }
    }

    /// Number of distinct blobs currently stored.
    pub fn len(&self) -> usize {
        self.blobs.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total bytes across all stored blobs.
    pub fn total_bytes(&self) -> u64 {
        self.blobs
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .map(|b| b.len() as u64)
            .sum()
    }

    /// Return a sorted list of all blob hashes in the store.
    pub fn all_hashes(&self) -> Vec<ContentHash> {
        let map = self.blobs.read().unwrap_or_else(|e| e.into_inner());
        let mut hashes: Vec<ContentHash> = map.keys().copied().collect();
        hashes.sort();
        hashes
    }

    fn read_map(&self) -> StoreResult<RwLockReadGuard<'_, HashMap<ContentHash, Bytes>>> {
        self.blobs
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    fn write_map(&self) -> StoreResult<RwLockWriteGuard<'_, HashMap<ContentHash, Bytes>>> {
        self.blobs
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BlobStore for InMemoryBlobStore {
    fn put(&self, data: &[u8]) -> StoreResult<ContentHash> {
        let hash = ContentHasher::hash(data);
        let mut map = self.write_map()?;
        // Content addressing guarantees an existing entry holds these bytes.
        map.entry(hash).or_insert_with(|| {
            debug!(hash = %hash.short_hex(), size = data.len(), "stored blob");
            Bytes::copy_from_slice(data)
        });
        Ok(hash)
    }

    fn get(&self, hash: &ContentHash) -> StoreResult<Option<Bytes>> {
        Ok(self.read_map()?.get(hash).cloned())
    }

    fn exists(&self, hash: &ContentHash) -> StoreResult<bool> {
        Ok(self.read_map()?.contains_key(hash))
    }
}

impl std::fmt::Debug for InMemoryBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBlobStore")
            .field("blob_count", &self.len())
            .finish()
    }
}
