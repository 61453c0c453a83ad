//! The [`VersionGraph`] trait defining the version storage interface.

use folio_types::{ProjectName, VersionId};

use crate::error::{GraphError, GraphResult};
use crate::version::{Version, VersionSummary};

/// Append-only store of immutable versions.
///
/// Implementations must be thread-safe (`Send + Sync`). An append is atomic:
/// readers observe either no version or the complete record, never a
/// partially written one.
pub trait VersionGraph: Send + Sync {
    /// Append a new version.
    ///
    /// Fails with [`GraphError::DuplicateVersion`] if the id is taken,
    /// [`GraphError::DanglingParent`] if the parent does not exist,
    /// [`GraphError::CrossProjectParent`] if the parent belongs to another
    /// project, and [`GraphError::DuplicatePageName`] if the snapshot lists a
    /// page name twice.
    fn append(&self, version: &Version) -> GraphResult<()>;

    /// Read a version by id. Returns `Ok(None)` if it does not exist.
    fn get(&self, id: &VersionId) -> GraphResult<Option<Version>>;

    /// Every version ever appended for `project`, newest first.
    fn versions_of(&self, project: &ProjectName) -> GraphResult<Vec<VersionSummary>>;

    /// Ids of the versions whose parent is `id`.
    fn children(&self, id: &VersionId) -> GraphResult<Vec<VersionId>>;

    fn contains(&self, id: &VersionId) -> GraphResult<bool> {
        Ok(self.get(id)?.is_some())
    }

    /// The parent chain starting at `tip`, newest first, ending at the
    /// project's root version.
    fn history(&self, tip: &VersionId) -> GraphResult<Vec<VersionSummary>> {
        let mut current = self
            .get(tip)?
            .ok_or_else(|| GraphError::VersionNotFound(tip.clone()))?;
        let mut chain = vec![current.summary()];

        while let Some(parent_id) = current.parent_id.clone() {
            current = self.get(&parent_id)?.ok_or_else(|| GraphError::DanglingParent {
                version: current.id.clone(),
                parent: parent_id,
            })?;
            chain.push(current.summary());
        }

        Ok(chain)
    }
}
