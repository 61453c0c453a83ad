//! Filesystem blob store.
//!
//! Layout under the root directory:
//!
//! ```text
//! <root>/ab/cdef...   blob whose hash is "abcdef..." (64 hex chars total)
//! <root>/tmp/         staging area for in-flight writes
//! ```
//!
//! Writes land in a temp file inside `tmp/` and are renamed into place, so a
//! reader never observes a partially written blob. Reads rehash the bytes and
//! report a [`StoreError::HashMismatch`] if the file was altered on disk.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use bytes::Bytes;
use folio_crypto::ContentHasher;
use folio_types::ContentHash;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::BlobStore;

/// Blob store backed by one file per blob.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Open (creating if necessary) a blob store rooted at `root`.
    pub fn open(root: impl AsRef<Path>) -> StoreResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join("tmp"))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file that holds `hash`.
    pub fn blob_path(&self, hash: &ContentHash) -> PathBuf {
        let hex = hash.to_hex();
        let (shard, rest) = hex.split_at(2);
        self.root.join(shard).join(rest)
    }
}

impl BlobStore for FsBlobStore {
    fn put(&self, data: &[u8]) -> StoreResult<ContentHash> {
        let hash = ContentHasher::hash(data);
        let path = self.blob_path(&hash);
        if path.exists() {
            return Ok(hash);
        }

        if let Some(shard) = path.parent() {
            fs::create_dir_all(shard)?;
        }
        let mut staged = NamedTempFile::new_in(self.root.join("tmp"))?;
        staged.write_all(data)?;
        staged.as_file().sync_all()?;
        // A concurrent writer of the same content may win the rename; both
        // files hold identical bytes, so either outcome is correct.
        staged.persist(&path).map_err(|e| StoreError::Io(e.error))?;

        debug!(hash = %hash.short_hex(), size = data.len(), "stored blob");
        Ok(hash)
    }

    fn get(&self, hash: &ContentHash) -> StoreResult<Option<Bytes>> {
        let data = match fs::read(self.blob_path(hash)) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let computed = ContentHasher::hash(&data);
        if computed != *hash {
            return Err(StoreError::HashMismatch {
                expected: *hash,
                computed,
            });
        }
        Ok(Some(Bytes::from(data)))
    }

    fn exists(&self, hash: &ContentHash) -> StoreResult<bool> {
        Ok(self.blob_path(hash).is_file())
    }
}
