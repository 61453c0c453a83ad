//! Error types for the version graph.

use folio_types::{PageName, ProjectName, VersionId};

/// Errors that can occur during version graph operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// A referenced version was not found.
    #[error("version not found: {0}")]
    VersionNotFound(VersionId),

    /// Attempted to append a version whose id already exists.
    #[error("duplicate version: {0}")]
    DuplicateVersion(VersionId),

    /// A parent reference points to a version that does not exist.
    #[error("dangling parent reference: version {version} references missing parent {parent}")]
    DanglingParent {
        /// The version containing the bad reference.
        version: VersionId,
        /// The missing parent.
        parent: VersionId,
    },

    /// A version's parent belongs to a different project.
    #[error("version {version} of {project} has parent {parent} from {parent_project}")]
    CrossProjectParent {
        version: VersionId,
        project: ProjectName,
        parent: VersionId,
        parent_project: ProjectName,
    },

    /// Two pages in one snapshot share a name.
    #[error("version {version} lists page {name} more than once")]
    DuplicatePageName { version: VersionId, name: PageName },

    /// Serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Storage I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A lock guarding in-memory state was poisoned by a panicking writer.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Convenience alias for graph results.
pub type GraphResult<T> = Result<T, GraphError>;
