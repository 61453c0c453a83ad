//! Append-only version graph for Folio.
//!
//! Every mutation of a project produces a new immutable [`Version`]: a full
//! snapshot of the project's page list plus a pointer to the version it was
//! derived from. Versions form a forest, one tree per project, linked by
//! `parent_id`.
//!
//! Each version stores its complete page list by value rather than a delta
//! against its parent, so reading any version (live or historical) needs no
//! replay. Only the small page index is duplicated; page bodies live in the
//! blob store and are shared by hash.
//!
//! # Invariants
//!
//! - Versions are immutable once appended.
//! - Version ids are unique across all projects.
//! - A version's parent exists and belongs to the same project.
//! - Page names are unique within a version.

pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;
pub mod version;

pub use error::{GraphError, GraphResult};
pub use fs::FsVersionGraph;
pub use memory::InMemoryVersionGraph;
pub use traits::VersionGraph;
pub use version::{PageMeta, Version, VersionSummary};
