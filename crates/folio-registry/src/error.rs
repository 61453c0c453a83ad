//! Error types for registry operations.

use folio_types::{ProjectName, VersionId};
use thiserror::Error;

/// Errors that can occur during registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The project was not found.
    #[error("project not found: {0}")]
    NotFound(ProjectName),

    /// A project with this name already exists.
    #[error("project already exists: {0}")]
    AlreadyExists(ProjectName),

    /// The live pointer moved since the caller read it.
    #[error("concurrent modification of {name}: expected live version {expected}, found {actual}")]
    ConcurrentModification {
        name: ProjectName,
        expected: VersionId,
        actual: VersionId,
    },

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during file-based registry operations.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A lock guarding registry state was poisoned by a panicking writer.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Convenience type alias for registry operations.
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
