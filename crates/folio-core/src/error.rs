use std::path::PathBuf;

use thiserror::Error;

use folio_registry::RegistryError;
use folio_store::StoreError;
use folio_types::{ContentHash, TypeError, VersionId};
use folio_versions::GraphError;

/// Errors returned by [`ProjectStore`](crate::ProjectStore) operations.
///
/// Every variant is recoverable at the caller's discretion except
/// [`ProjectError::ContentMissing`], which means a version references a blob
/// that is not in the blob store: a broken invariant, not a user error.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// A project or page name fails its grammar.
    #[error("invalid name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// Create was called for a project that already exists.
    #[error("a project named '{0}' already exists")]
    DuplicateName(String),

    #[error("project not found: {0}")]
    ProjectNotFound(String),

    #[error("version {version} not found for project {project}")]
    VersionNotFound { project: String, version: String },

    #[error("page {page:?} not found in {project} at version {version}")]
    PageNotFound {
        project: String,
        version: VersionId,
        page: String,
    },

    /// A snapshot references a blob that is not stored.
    #[error("content {hash} of page {page:?} in {project} is missing from the blob store")]
    ContentMissing {
        project: String,
        page: String,
        hash: ContentHash,
    },

    /// A direct content lookup found no blob under the hash.
    #[error("content not found: {0}")]
    ContentNotFound(ContentHash),

    /// Another writer moved the live pointer between read and swap.
    #[error("concurrent modification of {project}: expected live version {expected}, found {actual}")]
    ConcurrentModification {
        project: String,
        expected: VersionId,
        actual: VersionId,
    },

    /// Reading an import source failed.
    #[error("cannot import {path:?}: {source}")]
    Import {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("blob store error: {0}")]
    Store(#[source] StoreError),

    #[error("version graph error: {0}")]
    Graph(#[source] GraphError),

    #[error("registry error: {0}")]
    Registry(#[source] RegistryError),
}

impl ProjectError {
    /// Returns `true` for conflicts that a caller may resolve by retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentModification { .. })
    }

    /// Returns `true` for errors that indicate corrupted or dangling data.
    pub fn is_integrity_fault(&self) -> bool {
        matches!(
            self,
            Self::ContentMissing { .. } | Self::Store(StoreError::HashMismatch { .. })
        )
    }

    /// Returns `true` for the not-found family.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ProjectNotFound(_)
                | Self::VersionNotFound { .. }
                | Self::PageNotFound { .. }
                | Self::ContentNotFound(_)
        )
    }
}

impl From<TypeError> for ProjectError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::InvalidName { name, reason } => Self::InvalidName { name, reason },
            other => Self::InvalidName {
                name: String::new(),
                reason: other.to_string(),
            },
        }
    }
}

impl From<StoreError> for ProjectError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(hash) => Self::ContentNotFound(hash),
            other => Self::Store(other),
        }
    }
}

impl From<GraphError> for ProjectError {
    fn from(err: GraphError) -> Self {
        Self::Graph(err)
    }
}

impl From<RegistryError> for ProjectError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound(name) => Self::ProjectNotFound(name.to_string()),
            RegistryError::AlreadyExists(name) => Self::DuplicateName(name.to_string()),
            RegistryError::ConcurrentModification {
                name,
                expected,
                actual,
            } => Self::ConcurrentModification {
                project: name.to_string(),
                expected,
                actual,
            },
            other => Self::Registry(other),
        }
    }
}

/// Result alias for project store operations.
pub type ProjectResult<T> = Result<T, ProjectError>;

#[cfg(test)]
mod tests {
    use super::*;
    use folio_types::ProjectName;

    #[test]
    fn registry_errors_map_onto_taxonomy() {
        let name = ProjectName::new("docs").unwrap();
        assert!(matches!(
            ProjectError::from(RegistryError::AlreadyExists(name.clone())),
            ProjectError::DuplicateName(n) if n == "docs"
        ));
        assert!(ProjectError::from(RegistryError::NotFound(name)).is_not_found());
    }

    #[test]
    fn conflicts_are_retryable() {
        let err = ProjectError::from(RegistryError::ConcurrentModification {
            name: ProjectName::new("docs").unwrap(),
            expected: VersionId::generate(),
            actual: VersionId::generate(),
        });
        assert!(err.is_retryable());
        assert!(!err.is_integrity_fault());
    }

    #[test]
    fn missing_content_is_an_integrity_fault() {
        let err = ProjectError::ContentMissing {
            project: "docs".into(),
            page: "index".into(),
            hash: ContentHash::from_digest([7; 32]),
        };
        assert!(err.is_integrity_fault());
        assert!(!err.is_retryable());
    }

    #[test]
    fn invalid_names_keep_the_input() {
        let err = ProjectError::from(folio_types::validate_project_name("Has Spaces").unwrap_err());
        assert!(matches!(err, ProjectError::InvalidName { ref name, .. } if name == "Has Spaces"));
    }
}
