//! Content-addressed blob storage for Folio.
//!
//! Page bodies are stored as immutable blobs keyed by the SHA-256 hash of
//! their bytes. This is the single point of deduplication: two pages, in
//! the same project or in different ones, with byte-identical content share
//! one stored blob.
//!
//! # Storage Backends
//!
//! All backends implement the [`BlobStore`] trait:
//!
//! - [`InMemoryBlobStore`] -- `HashMap`-based store for tests and embedding
//! - [`FsBlobStore`] -- one file per blob under a sharded directory tree
//!
//! # Design Rules
//!
//! 1. Blobs are immutable once written. Writing the same bytes twice is an
//!    observable no-op.
//! 2. Writes need no coordination: they are idempotent and keyed by content.
//! 3. Blobs are never deleted by this crate (no reference counting).
//! 4. The store never interprets blob contents.
//! 5. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use fs::FsBlobStore;
pub use memory::InMemoryBlobStore;
pub use traits::BlobStore;
